use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::{eyre, WrapErr};
use tracing_subscriber::EnvFilter;

fn env_filter(debug: bool) -> EnvFilter {
    let default = if debug {
        "info,co2_forecast_tui=debug"
    } else {
        "info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into())
}

/// Sends logs to a file so the alternate screen stays clean.
pub fn init_file_tracing(path: &Path, debug: bool) -> color_eyre::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| eyre!(err.to_string()))
}

/// Headless runs log to stderr, leaving stdout for the output.
pub fn init_stderr_tracing(debug: bool) -> color_eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| eyre!(err.to_string()))
}
