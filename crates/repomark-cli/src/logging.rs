//! Logging initialization and configuration.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the logging subsystem.
///
/// The interactive session owns the terminal, so logs are appended to
/// `log_file`, or to `repomark.log` in the platform data directory when
/// no path is given. If the file cannot be opened, logs fall back to
/// stderr.
///
/// # Errors
///
/// Returns an error if the log level is invalid.
pub fn init(level: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .context("failed to parse log level")?;

    let path = log_file.map_or_else(default_log_path, Path::to_path_buf);
    let writer = match open_log_file(&path) {
        Ok(file) => BoxMakeWriter::new(Arc::new(file)),
        Err(_) => BoxMakeWriter::new(std::io::stderr),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .ok(); // Ignore if already initialized

    Ok(())
}

fn default_log_path() -> PathBuf {
    let dir = dirs::data_dir().map_or_else(|| PathBuf::from(".repomark"), |d| d.join("repomark"));
    dir.join("repomark.log")
}

fn open_log_file(path: &Path) -> std::io::Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
