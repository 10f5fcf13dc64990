use color_eyre::eyre::{eyre, WrapErr};
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::climate_actions::DEFAULT_ACTION_COUNT;
use crate::forecast::FailurePolicy;

pub const DEFAULT_FORECAST_BASE_URL: &str = "http://127.0.0.1:8000/api/1/forecast";
pub const DEFAULT_ACTIONS_BASE_URL: &str = "http://127.0.0.1:8000/api/1/actions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILE: &str = "co2_forecast.log";

/// Deployment settings, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub forecast_base_url: String,
    pub actions_base_url: String,
    pub actions_count: u8,
    pub request_timeout: Duration,
    pub failure_policy: FailurePolicy,
    pub initial_horizon: i64,
    pub log_file: PathBuf,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            forecast_base_url: DEFAULT_FORECAST_BASE_URL.to_string(),
            actions_base_url: DEFAULT_ACTIONS_BASE_URL.to_string(),
            actions_count: DEFAULT_ACTION_COUNT,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            failure_policy: FailurePolicy::default(),
            initial_horizon: 1,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            debug: false,
        }
    }
}

/// Initializes the application configuration
pub fn init_app_config() -> color_eyre::eyre::Result<AppConfig> {
    // Load environment variables from .env file
    dotenv().ok();

    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    /// Builds the config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> color_eyre::eyre::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let request_timeout = match get("FORECAST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .wrap_err_with(|| format!("Invalid FORECAST_TIMEOUT_SECS: {raw}"))?;
                if secs == 0 {
                    return Err(eyre!("FORECAST_TIMEOUT_SECS must be greater than zero"));
                }
                Duration::from_secs(secs)
            }
            None => defaults.request_timeout,
        };

        let failure_policy = match get("FORECAST_ON_UNREACHABLE") {
            Some(raw) => FailurePolicy::parse(&raw).ok_or_else(|| {
                eyre!("Invalid FORECAST_ON_UNREACHABLE: {raw} (expected `fallback` or `error`)")
            })?,
            None => defaults.failure_policy,
        };

        let initial_horizon = match get("FORECAST_HORIZON") {
            Some(raw) => raw
                .parse()
                .wrap_err_with(|| format!("Invalid FORECAST_HORIZON: {raw}"))?,
            None => defaults.initial_horizon,
        };

        let actions_count = match get("ACTIONS_COUNT") {
            Some(raw) => raw
                .parse()
                .wrap_err_with(|| format!("Invalid ACTIONS_COUNT: {raw}"))?,
            None => defaults.actions_count,
        };

        Ok(Self {
            forecast_base_url: get("FORECAST_BASE_URL").unwrap_or(defaults.forecast_base_url),
            actions_base_url: get("ACTIONS_BASE_URL").unwrap_or(defaults.actions_base_url),
            actions_count,
            request_timeout,
            failure_policy,
            initial_horizon,
            log_file: get("LOG_FILE").map_or(defaults.log_file, PathBuf::from),
            debug: get("DEBUG").is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> color_eyre::eyre::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(config_from(&[]).unwrap(), AppConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("FORECAST_BASE_URL", "https://tunnel.example/api/1/forecast"),
            ("FORECAST_TIMEOUT_SECS", "8"),
            ("FORECAST_ON_UNREACHABLE", "error"),
            ("FORECAST_HORIZON", "36"),
            ("ACTIONS_COUNT", "5"),
            ("DEBUG", "1"),
        ])
        .unwrap();

        assert_eq!(config.forecast_base_url, "https://tunnel.example/api/1/forecast");
        assert_eq!(config.request_timeout, Duration::from_secs(8));
        assert_eq!(config.failure_policy, FailurePolicy::SurfaceErrors);
        assert_eq!(config.initial_horizon, 36);
        assert_eq!(config.actions_count, 5);
        assert!(config.debug);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(config_from(&[("FORECAST_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config_from(&[("FORECAST_TIMEOUT_SECS", "0")]).is_err());
        assert!(config_from(&[("FORECAST_ON_UNREACHABLE", "retry")]).is_err());
        assert!(config_from(&[("ACTIONS_COUNT", "-1")]).is_err());
    }

    #[test]
    fn blank_values_keep_defaults() {
        let config = config_from(&[("FORECAST_BASE_URL", "   "), ("DEBUG", "")]).unwrap();
        assert_eq!(config.forecast_base_url, DEFAULT_FORECAST_BASE_URL);
        assert!(!config.debug);
    }
}
