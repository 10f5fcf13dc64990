// Export our modules for use in binaries and tests
pub mod app;
pub mod cli;
pub mod climate_actions;
pub mod config;
pub mod domain;
pub mod event;
pub mod forecast;
pub mod logging;
pub mod terminal;
pub mod ui;

pub use domain::{ConsequenceEntry, DataSource, HorizonMonths, PlotPoint};
pub use forecast::{FailurePolicy, ForecastError, ForecastFetcher, ForecastOutcome};
