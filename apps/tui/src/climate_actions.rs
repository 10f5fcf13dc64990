//! Recommended climate actions, served by the same API as the forecast.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::ClimateAction;
use crate::forecast::ForecastError;

pub const DEFAULT_ACTION_COUNT: u8 = 8;

#[derive(Debug, Deserialize)]
struct ActionsResponse {
    #[serde(default)]
    actions: Option<Vec<(String, ActionBody)>>,
}

#[derive(Debug, Deserialize)]
struct ActionBody {
    action: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Clone)]
pub struct ClimateActionsClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ClimateActionsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("co2_forecast/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    /// `GET {base}/{count}`; a missing or `null` `actions` is an empty list.
    pub async fn fetch(&self, count: u8) -> Result<Vec<ClimateAction>, ForecastError> {
        let url = format!("{}/{count}", self.base_url.trim_end_matches('/'));
        tracing::debug!(%url, "requesting climate actions");

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

        let actions = parse_actions(&body)?;
        tracing::info!(count = actions.len(), "climate actions received");
        Ok(actions)
    }
}

pub fn parse_actions(body: &[u8]) -> Result<Vec<ClimateAction>, ForecastError> {
    let response: ActionsResponse = serde_json::from_slice(body)
        .map_err(|err| ForecastError::MalformedBody(err.to_string()))?;

    Ok(response
        .actions
        .unwrap_or_default()
        .into_iter()
        .map(|(key, body)| ClimateAction::new(key, body.action, body.icon))
        .collect())
}
