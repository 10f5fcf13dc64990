#[allow(clippy::module_inception)]
mod config;

pub use config::{
    init_app_config, AppConfig, DEFAULT_ACTIONS_BASE_URL, DEFAULT_FORECAST_BASE_URL,
    DEFAULT_LOG_FILE, DEFAULT_TIMEOUT_SECS,
};
