use std::time::Duration;

/// Failure causes of a forecast fetch.
///
/// `Display` is the message shown to the user; the payloads carry detail for
/// the log.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForecastError {
    #[error("The request took too long. Try again.")]
    Timeout(Duration),

    #[error("Could not reach the forecast server. Check your connection or whether the tunnel is up.")]
    NetworkUnreachable(String),

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Could not read the server response.")]
    MalformedBody(String),

    #[error("The server returned incomplete or invalid data.")]
    IncompletePayload(String),

    #[error("Local forecast data is unavailable.")]
    FallbackUnavailable(String),
}

impl ForecastError {
    /// Timeouts and transport failures may be masked by the fallback dataset.
    /// Everything else means the service answered with something unusable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::NetworkUnreachable(_))
    }

    pub(crate) fn from_transport(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            return Self::Timeout(timeout);
        }
        Self::NetworkUnreachable(err.to_string())
    }

    /// Builds the error for a non-success status, preferring a `message`
    /// field from the body over the generic status text.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: &[u8]) -> Self {
        let server_message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .and_then(|json| {
                json.get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string)
            })
            .filter(|message| !message.trim().is_empty());

        let message = server_message.unwrap_or_else(|| {
            format!(
                "HTTP error {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown status")
            )
        });

        Self::Http {
            status: status.as_u16(),
            message,
        }
    }
}
