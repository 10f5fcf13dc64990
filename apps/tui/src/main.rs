use clap::Parser;
use co2_forecast_tui::app::App;
use co2_forecast_tui::cli::CliArgs;
use co2_forecast_tui::{config, event, logging, terminal};
use color_eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = config::init_app_config()?;

    // Check if we're running in a terminal
    if args.headless || !is_terminal() {
        logging::init_stderr_tracing(config.debug)?;
        return event::run_headless(&config, args.json).await;
    }

    logging::init_file_tracing(&config.log_file, config.debug)?;
    tracing::info!(
        base_url = %config.forecast_base_url,
        timeout_secs = config.request_timeout.as_secs(),
        policy = config.failure_policy.as_str(),
        "starting dashboard"
    );

    let mut app = App::new(&config)?;

    let mut terminal = terminal::setup_terminal()?;
    let result = event::run(&mut terminal, &mut app).await;
    terminal::cleanup_terminal_state(true, true);

    if let Err(err) = &result {
        tracing::error!(error = %err, "dashboard exited with an error");
    }
    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
