use std::time::Duration;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::domain::{ConsequenceEntry, DataSource, HorizonMonths, PlotPoint};
use crate::forecast::fallback::FallbackProvider;
use crate::forecast::merge::merge_payload;
use crate::forecast::normalize::{extract_consequences, extract_payload};
use crate::forecast::ForecastError;

/// What to do when the service cannot be reached in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Timeouts and transport failures are replaced by the offline snapshot.
    #[default]
    FallbackOnUnreachable,
    /// Timeouts and transport failures are shown to the user.
    SurfaceErrors,
}

impl FailurePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "fallback" => Some(Self::FallbackOnUnreachable),
            "error" => Some(Self::SurfaceErrors),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FallbackOnUnreachable => "fallback",
            Self::SurfaceErrors => "error",
        }
    }
}

/// Terminal result of one fetch: a series (possibly empty), the
/// consequences, and the error if the fetch failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOutcome {
    pub points: Vec<PlotPoint>,
    pub consequences: Vec<ConsequenceEntry>,
    pub error: Option<ForecastError>,
    pub source: DataSource,
}

impl ForecastOutcome {
    pub const fn empty() -> Self {
        Self {
            points: Vec::new(),
            consequences: Vec::new(),
            error: None,
            source: DataSource::None,
        }
    }

    pub const fn failed(error: ForecastError) -> Self {
        Self {
            points: Vec::new(),
            consequences: Vec::new(),
            error: Some(error),
            source: DataSource::None,
        }
    }
}

struct LiveForecast {
    points: Vec<PlotPoint>,
    consequences: Vec<ConsequenceEntry>,
}

#[derive(Debug, Clone)]
pub struct ForecastFetcher {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    policy: FailurePolicy,
    fallback: FallbackProvider,
}

impl ForecastFetcher {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        policy: FailurePolicy,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("co2_forecast/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
            policy,
            fallback: FallbackProvider::bundled(),
        })
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackProvider) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn endpoint(&self, horizon: HorizonMonths) -> String {
        format!("{}/{horizon}", self.base_url.trim_end_matches('/'))
    }

    /// Fetches the forecast for `requested` months.
    ///
    /// Zero or negative requests return an empty outcome without touching
    /// the network. The request races a timer; whichever finishes first
    /// wins and the other is dropped. Returns `None` only when `cancel`
    /// fires first, meaning a newer fetch superseded this one.
    #[tracing::instrument(name = "fetch_forecast", skip(self, cancel))]
    pub async fn fetch_forecast(
        &self,
        requested: i64,
        cancel: &CancellationToken,
    ) -> Option<ForecastOutcome> {
        let Some(horizon) = HorizonMonths::from_requested(requested) else {
            tracing::debug!("no forecast requested");
            return Some(ForecastOutcome::empty());
        };

        let live = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!("superseded before completion");
                return None;
            }
            () = tokio::time::sleep(self.timeout) => Err(ForecastError::Timeout(self.timeout)),
            result = self.request_live(horizon) => result,
        };

        Some(self.resolve(live))
    }

    async fn request_live(&self, horizon: HorizonMonths) -> Result<LiveForecast, ForecastError> {
        let url = self.endpoint(horizon);
        tracing::debug!(%url, "requesting forecast");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| ForecastError::from_transport(&err, self.timeout))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| ForecastError::from_transport(&err, self.timeout))?;

        if !status.is_success() {
            return Err(ForecastError::from_status(status, &body));
        }

        let json: Value = serde_json::from_slice(&body)
            .map_err(|err| ForecastError::MalformedBody(err.to_string()))?;

        let payload = extract_payload(&json)?;
        let consequences = extract_consequences(&json);

        tracing::info!(
            historical = payload.last_16_dates.len(),
            forecast = payload.dates.len(),
            consequences = consequences.len(),
            "forecast received"
        );

        Ok(LiveForecast {
            points: merge_payload(&payload),
            consequences,
        })
    }

    fn resolve(&self, live: Result<LiveForecast, ForecastError>) -> ForecastOutcome {
        match live {
            Ok(forecast) => ForecastOutcome {
                points: forecast.points,
                consequences: forecast.consequences,
                error: None,
                source: DataSource::Live,
            },
            Err(err)
                if err.is_recoverable() && self.policy == FailurePolicy::FallbackOnUnreachable =>
            {
                tracing::warn!(error = ?err, "forecast service unavailable, using offline snapshot");
                match self.fallback.fallback() {
                    Ok((points, consequences)) => ForecastOutcome {
                        points,
                        consequences,
                        error: None,
                        source: DataSource::Fallback,
                    },
                    Err(fallback_err) => {
                        tracing::error!(error = ?fallback_err, "offline snapshot rejected");
                        ForecastOutcome::failed(fallback_err)
                    }
                }
            }
            Err(err) => {
                tracing::error!(error = ?err, "forecast failed: {err}");
                ForecastOutcome::failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(policy: FailurePolicy) -> ForecastFetcher {
        ForecastFetcher::new("http://127.0.0.1:9/api/1/forecast/", Duration::from_secs(1), policy)
            .unwrap()
    }

    #[test]
    fn policy_parsing() {
        assert_eq!(
            FailurePolicy::parse(" Fallback "),
            Some(FailurePolicy::FallbackOnUnreachable)
        );
        assert_eq!(FailurePolicy::parse("error"), Some(FailurePolicy::SurfaceErrors));
        assert_eq!(FailurePolicy::parse("retry"), None);
    }

    #[test]
    fn endpoint_appends_horizon_segment() {
        let fetcher = fetcher(FailurePolicy::default());
        let horizon = HorizonMonths::from_requested(24).unwrap();
        assert_eq!(
            fetcher.endpoint(horizon),
            "http://127.0.0.1:9/api/1/forecast/24"
        );
    }

    #[test]
    fn recoverable_errors_use_snapshot_under_fallback_policy() {
        let outcome = fetcher(FailurePolicy::FallbackOnUnreachable)
            .resolve(Err(ForecastError::Timeout(Duration::from_secs(1))));
        let (expected, _) = FallbackProvider::bundled().fallback().unwrap();

        assert_eq!(outcome.error, None);
        assert_eq!(outcome.source, DataSource::Fallback);
        assert_eq!(outcome.points, expected);
    }

    #[test]
    fn recoverable_errors_surface_under_error_policy() {
        let outcome = fetcher(FailurePolicy::SurfaceErrors)
            .resolve(Err(ForecastError::NetworkUnreachable("refused".into())));

        assert!(outcome.points.is_empty());
        assert!(matches!(
            outcome.error,
            Some(ForecastError::NetworkUnreachable(_))
        ));
    }

    #[test]
    fn bad_data_never_falls_back() {
        let outcome = fetcher(FailurePolicy::FallbackOnUnreachable)
            .resolve(Err(ForecastError::IncompletePayload("dates".into())));

        assert!(outcome.points.is_empty());
        assert_eq!(outcome.source, DataSource::None);
        assert!(matches!(
            outcome.error,
            Some(ForecastError::IncompletePayload(_))
        ));
    }

    #[test]
    fn broken_snapshot_surfaces_as_unavailable() {
        let outcome = fetcher(FailurePolicy::FallbackOnUnreachable)
            .with_fallback(FallbackProvider::from_static("[]"))
            .resolve(Err(ForecastError::Timeout(Duration::from_secs(1))));

        assert!(outcome.points.is_empty());
        assert!(matches!(
            outcome.error,
            Some(ForecastError::FallbackUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn non_positive_horizon_short_circuits() {
        let outcome = fetcher(FailurePolicy::SurfaceErrors)
            .fetch_forecast(0, &CancellationToken::new())
            .await;
        assert_eq!(outcome, Some(ForecastOutcome::empty()));
    }

    #[tokio::test]
    async fn cancelled_fetch_yields_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = fetcher(FailurePolicy::FallbackOnUnreachable)
            .fetch_forecast(12, &cancel)
            .await;
        assert_eq!(outcome, None);
    }
}
