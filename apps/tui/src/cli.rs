use clap::{CommandFactory, Parser};

#[derive(Debug, Parser)]
#[command(name = "co2_forecast", version, about = "CO2 emissions forecast dashboard")]
pub struct CliArgs {
    /// Fetch one forecast, print it and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless forecast as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Forecast endpoint base URL
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Climate actions endpoint base URL
    #[arg(long = "actions-url", value_name = "URL")]
    pub actions_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// What to do when the server is unreachable: `fallback` or `error`
    #[arg(long, value_name = "POLICY")]
    pub policy: Option<String>,

    /// Months to forecast
    #[arg(long, value_name = "MONTHS", allow_negative_numbers = true)]
    pub horizon: Option<i64>,

    /// Log file used while the dashboard is open
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(url) = &self.base_url {
            std::env::set_var("FORECAST_BASE_URL", url);
        }
        if let Some(url) = &self.actions_url {
            std::env::set_var("ACTIONS_BASE_URL", url);
        }
        if let Some(secs) = self.timeout {
            std::env::set_var("FORECAST_TIMEOUT_SECS", secs.to_string());
        }
        if let Some(policy) = &self.policy {
            std::env::set_var("FORECAST_ON_UNREACHABLE", policy);
        }
        if let Some(horizon) = self.horizon {
            std::env::set_var("FORECAST_HORIZON", horizon.to_string());
        }
        if let Some(path) = &self.log_file {
            std::env::set_var("LOG_FILE", path);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    pub fn help_text() -> String {
        let mut command = Self::command();
        let mut buffer = Vec::new();
        command.write_help(&mut buffer).ok();
        String::from_utf8_lossy(&buffer).to_string()
    }
}
