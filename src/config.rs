//! Startup configuration: where the catalog lives and how chatty the log is.
//! Every setting can come from a flag or an environment variable and falls
//! back to a folder beneath the user's home directory.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".music-catalog";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "catalog.sqlite";
const LOG_DIR_NAME: &str = "logs";

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal catalog of artists and songs", long_about = None)]
pub struct Args {
    /// Path of the SQLite catalog file.
    #[arg(long, env = "MUSIC_CATALOG_DB")]
    pub db: Option<PathBuf>,

    /// Log filter passed to the file logger (error, warn, info, debug, trace).
    #[arg(long, default_value = "info", env = "MUSIC_CATALOG_LOG")]
    pub log_level: String,

    /// Directory receiving rotated log files.
    #[arg(long, env = "MUSIC_CATALOG_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Config {
    /// Fill in every setting the user did not supply.
    pub fn from_args(args: Args) -> Result<Self> {
        let db_path = match args.db {
            Some(path) => path,
            None => data_dir()?.join(DB_FILE_NAME),
        };
        let log_dir = match args.log_dir {
            Some(path) => path,
            None => data_dir()?.join(LOG_DIR_NAME),
        };

        Ok(Self {
            db_path,
            log_level: args.log_level,
            log_dir,
        })
    }
}

/// Resolve the absolute path to the application folder inside the user's home.
fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
