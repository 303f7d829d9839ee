//! Prediction transport port: Trait for the single HTTP exchange.
//!
//! This trait abstracts the HTTP client (ureq) from the prediction client, so
//! status and body interpretation stays testable without a network.

/// A response that arrived, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for posting a JSON body to the prediction endpoint.
pub trait PredictionTransport: Send + Sync {
    /// Error type when no response could be obtained.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send `body` as `application/json` and return the response.
    ///
    /// Non-2xx statuses are responses, not errors.
    ///
    /// # Errors
    /// Returns error only when the exchange could not complete.
    fn post_json(&self, body: &str) -> Result<TransportResponse, Self::Error>;

    /// Where requests go, for logs and the status line.
    fn endpoint(&self) -> &str;
}
