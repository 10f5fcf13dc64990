use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::app::{handle_input, App};
use crate::config::AppConfig;
use crate::domain::{ConsequenceEntry, DataSource, HorizonMonths, PlotPoint};
use crate::forecast::{ForecastFetcher, ForecastOutcome};
use crate::terminal::Tui;
use crate::ui;

/// One forecast fetch, as printed by `--headless --json`.
#[derive(Debug, Serialize)]
pub struct HeadlessReport {
    pub horizon: i64,
    pub source: DataSource,
    pub error: Option<String>,
    pub generated_at: String,
    pub points: Vec<PlotPoint>,
    pub consequences: Vec<ConsequenceEntry>,
}

/// Reports the horizon that was actually fetched; oversized requests show
/// the clamped value.
pub fn build_headless_report(requested: i64, outcome: ForecastOutcome) -> HeadlessReport {
    HeadlessReport {
        horizon: HorizonMonths::from_requested(requested).map_or(requested, |h| i64::from(h.get())),
        source: outcome.source,
        error: outcome.error.as_ref().map(ToString::to_string),
        generated_at: chrono::Utc::now().to_rfc3339(),
        points: outcome.points,
        consequences: outcome.consequences,
    }
}

/// Run one fetch without the UI and print the result.
pub async fn run_headless(config: &AppConfig, json: bool) -> Result<()> {
    let fetcher = ForecastFetcher::new(
        config.forecast_base_url.clone(),
        config.request_timeout,
        config.failure_policy,
    )
    .wrap_err("Failed to build forecast HTTP client")?;

    let horizon = config.initial_horizon;
    let outcome = fetcher
        .fetch_forecast(horizon, &CancellationToken::new())
        .await
        .unwrap_or_else(ForecastOutcome::empty);
    let report = build_headless_report(horizon, outcome);

    if json {
        let json = serde_json::to_string_pretty(&report)?;
        println!("{json}");
    } else {
        render_headless_table(&report);
    }

    Ok(())
}

fn render_headless_table(report: &HeadlessReport) {
    println!("\nCO2 Forecast ({} months)", report.horizon);
    println!("=========================");
    println!("Source: {}", report.source.label());

    if let Some(error) = &report.error {
        println!("Error: {error}");
    }

    if !report.points.is_empty() {
        println!("\n{:<12} {:>12} {:>12}", "Date", "Historical", "Forecast");
        for point in &report.points {
            println!(
                "{:<12} {:>12} {:>12}",
                point.date,
                format_value(point.historical),
                format_value(point.forecast)
            );
        }
    }

    println!("\nShowing {} consequences", report.consequences.len());
    for consequence in &report.consequences {
        println!(
            "- [{}] {} (Impact: {}/5)",
            consequence.icon, consequence.description, consequence.impact_level
        );
    }
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

/// Run the main application event loop
pub async fn run(terminal: &mut Tui, app: &mut App) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    app.start();

    loop {
        // Completions first so the frame reflects them
        app.drain_events();
        app.update();

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        // The blocking poll leaves the runtime's worker threads free for fetches
        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::Resize(_, _)) => {
                    // Non-fatal redraw error
                    let _ = terminal.draw(|f| ui::ui(app, f));
                }
                Ok(_) | Err(_) => {}
            }
        }

        // Let spawned fetches make progress between polls
        tokio::task::yield_now().await;
    }

    app.actions.cancel_in_flight();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastError;

    #[test]
    fn report_carries_error_text_and_empty_series() {
        let report = build_headless_report(
            6,
            ForecastOutcome::failed(ForecastError::Http {
                status: 500,
                message: "model unavailable".into(),
            }),
        );

        assert_eq!(report.error.as_deref(), Some("model unavailable"));
        assert!(report.points.is_empty());
        assert_eq!(report.source, DataSource::None);
    }

    #[test]
    fn report_serializes_expected_fields() {
        let outcome = ForecastOutcome {
            points: vec![PlotPoint::historical("2025-01", 420.5)],
            consequences: Vec::new(),
            error: None,
            source: DataSource::Live,
        };
        let value = serde_json::to_value(build_headless_report(1, outcome)).unwrap();

        assert_eq!(value["horizon"], 1);
        assert_eq!(value["source"], "live");
        assert!(value["error"].is_null());
        assert_eq!(value["points"][0]["historical"], 420.5);
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn report_shows_clamped_horizon() {
        let outcome = ForecastOutcome {
            points: vec![PlotPoint::forecast("2024-120", 430.0)],
            consequences: Vec::new(),
            error: None,
            source: DataSource::Live,
        };

        assert_eq!(build_headless_report(500, outcome).horizon, 120);
        assert_eq!(build_headless_report(0, ForecastOutcome::empty()).horizon, 0);
    }

    #[test]
    fn missing_values_print_as_dash() {
        assert_eq!(format_value(None), "-");
        assert_eq!(format_value(Some(421.0)), "421.00");
    }
}
