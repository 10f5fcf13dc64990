use serde_json::Value;

use crate::domain::{ConsequenceEntry, PlotPoint};
use crate::forecast::merge::merge_payload;
use crate::forecast::normalize::{extract_consequences, extract_series};
use crate::forecast::ForecastError;

/// Last-known-good snapshot shipped inside the binary. Same shape as the
/// `data` object of a live response.
const BUNDLED_SNAPSHOT: &str = include_str!("../../assets/fallback_forecast.json");

/// Supplies the offline dataset used when the forecast service cannot be
/// reached in time.
#[derive(Debug, Clone)]
pub struct FallbackProvider {
    snapshot: &'static str,
}

impl Default for FallbackProvider {
    fn default() -> Self {
        Self::bundled()
    }
}

impl FallbackProvider {
    pub const fn bundled() -> Self {
        Self {
            snapshot: BUNDLED_SNAPSHOT,
        }
    }

    /// Uses another snapshot text; the bundled one is the only production source.
    pub const fn from_static(snapshot: &'static str) -> Self {
        Self { snapshot }
    }

    pub fn fallback(&self) -> Result<(Vec<PlotPoint>, Vec<ConsequenceEntry>), ForecastError> {
        let data: Value = serde_json::from_str(self.snapshot)
            .map_err(|err| ForecastError::FallbackUnavailable(err.to_string()))?;

        let payload = extract_series(&data).map_err(|err| match err {
            ForecastError::IncompletePayload(detail) => ForecastError::FallbackUnavailable(detail),
            other => other,
        })?;

        // The snapshot is a bare `data` object, so its consequences sit at the top level.
        Ok((merge_payload(&payload), extract_consequences(&data)))
    }
}
