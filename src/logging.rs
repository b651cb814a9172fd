//! File logging for the terminal shell. The TUI owns stdout, so every event
//! goes to a rotating log file instead.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;

const LOG_FILE_BASENAME: &str = "music-catalog";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGER: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

/// Start the file logger. Calling it again with the same directory is a
/// no-op; switching directories after startup is refused.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<()> {
    if let Some(active) = LOGGER.get() {
        if active.log_dir == log_dir {
            return Ok(());
        }
        bail!(
            "logging already initialized at `{}`",
            active.log_dir.display()
        );
    }

    LOGGER.get_or_try_init(|| -> Result<ActiveLogger> {
        std::fs::create_dir_all(log_dir).with_context(|| {
            format!("failed to create log directory `{}`", log_dir.display())
        })?;

        let handle = Logger::try_with_str(level)
            .map_err(|err| anyhow!("invalid log level `{level}`: {err}"))?
            .log_to_file(
                FileSpec::default()
                    .directory(log_dir)
                    .basename(LOG_FILE_BASENAME),
            )
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .context("failed to start logger")?;

        info!(
            "event=app_start module=core status=ok version={} level={level}",
            env!("CARGO_PKG_VERSION")
        );

        Ok(ActiveLogger {
            log_dir: log_dir.to_path_buf(),
            _handle: handle,
        })
    })?;

    Ok(())
}
