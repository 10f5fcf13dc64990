//! Forecast retrieval pipeline: fetch, normalize, merge and fall back.

pub mod error;
pub mod fallback;
pub mod fetcher;
pub mod merge;
pub mod normalize;

pub use error::ForecastError;
pub use fallback::FallbackProvider;
pub use fetcher::{FailurePolicy, ForecastFetcher, ForecastOutcome};
pub use merge::merge;
