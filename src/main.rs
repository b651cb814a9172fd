//! Binary entry point: resolve configuration, start file logging, open the
//! catalog, and drive the terminal shell until the user quits.
use anyhow::{Context, Result};
use clap::Parser;
use music_catalog::config::{Args, Config};
use music_catalog::logging::init_logging;
use music_catalog::{run_app, App, Catalog, Store};

fn main() -> Result<()> {
    let config = Config::from_args(Args::parse())?;
    init_logging(&config.log_level, &config.log_dir)?;

    let store = Store::open(&config.db_path).with_context(|| {
        format!("failed to open catalog at `{}`", config.db_path.display())
    })?;

    let mut app = App::new(Catalog::new(store))?;
    run_app(&mut app)
}
