//! Prediction client: Sends validated features and interprets the reply.

use serde::{Deserialize, Serialize};

use crate::domain::{decode_prediction, FeatureValues, PredictionResponse};
use crate::ports::{PredictionTransport, TransportResponse};

/// Why a submission produced no prediction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictionError {
    /// No response arrived
    #[error("Network error: could not reach the prediction service")]
    Transport { detail: String },

    /// Non-2xx status, with the server's message or a status fallback
    #[error("{message}")]
    Server { status: u16, message: String },

    /// 2xx with a body of the wrong shape
    #[error("Malformed response from the prediction service")]
    MalformedResponse { detail: String },
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    features: &'a FeatureValues,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Client for the remote prediction service.
///
/// Sends one request per call and never retries.
pub struct PredictionClient<T: PredictionTransport> {
    transport: T,
}

impl<T: PredictionTransport> PredictionClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// Submit features and decode the prediction.
    ///
    /// # Errors
    /// Returns `PredictionError` for transport failures, non-2xx statuses
    /// and malformed success bodies.
    pub fn submit(&self, features: &FeatureValues) -> Result<PredictionResponse, PredictionError> {
        let body = serde_json::to_string(&PredictRequest { features }).map_err(|e| {
            PredictionError::Transport {
                detail: format!("could not encode request: {e}"),
            }
        })?;

        tracing::info!(
            endpoint = self.transport.endpoint(),
            features = features.len(),
            "Sending prediction request"
        );

        let response = self.transport.post_json(&body).map_err(|e| {
            tracing::warn!("Prediction request failed: {}", e);
            PredictionError::Transport {
                detail: e.to_string(),
            }
        })?;

        interpret(response)
    }
}

fn interpret(response: TransportResponse) -> Result<PredictionResponse, PredictionError> {
    if !response.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&response.body)
            .ok()
            .and_then(|b| b.error)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Server error: {}", response.status));

        tracing::warn!(status = response.status, "Prediction service returned an error");
        return Err(PredictionError::Server {
            status: response.status,
            message,
        });
    }

    let prediction = decode_prediction(&response.body).map_err(|e| {
        tracing::warn!("Malformed prediction response: {}", e);
        PredictionError::MalformedResponse {
            detail: e.to_string(),
        }
    })?;

    tracing::info!(
        prediction = %prediction.prediction,
        risk = %prediction.risk_tier(),
        "Prediction received"
    );

    Ok(prediction)
}
