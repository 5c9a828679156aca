//! Logging setup: stdout plus a timestamped log file.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{Error, Result};

/// Default directory for log files.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Log file name for a run started at `started`.
pub fn log_file_name(started: NaiveDateTime) -> String {
    started.format("%Y%m%d_%H%M%S.log").to_string()
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the level chosen by `debug`. When `log_dir` is
/// given, every line is also written (without colors) to a new file in
/// it, whose path is returned.
pub fn init_logging(debug: bool, log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let log_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let (file_layer, log_path) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let path = dir.join(log_file_name(Local::now().naive_local()));
            let file = File::create(&path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Arc::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialise logging: {}", e)))?;

    Ok(log_path)
}
