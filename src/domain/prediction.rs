//! Prediction result types.
//!
//! Represents the decoded response of the remote prediction service and the
//! display-only interpretations derived from it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::schema::FeatureSchema;

/// Number of importances shown in the details view.
pub const TOP_IMPORTANCES: usize = 10;

/// Diagnosis label returned by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosisLabel {
    Malignant,
    Benign,
}

impl DiagnosisLabel {
    #[must_use]
    pub fn is_malignant(self) -> bool {
        matches!(self, Self::Malignant)
    }

    /// Advisory shown under the result.
    #[must_use]
    pub fn advisory(self) -> &'static str {
        match self {
            Self::Malignant => {
                "Warning: This prediction suggests a malignant tumor. Please consult with a healthcare professional immediately."
            }
            Self::Benign => {
                "This prediction suggests a benign tumor, but regular check-ups are still recommended."
            }
        }
    }
}

impl std::fmt::Display for DiagnosisLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malignant => write!(f, "Malignant"),
            Self::Benign => write!(f, "Benign"),
        }
    }
}

/// Coarse risk classification, for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskTier {
    /// Classify a probability; lower bounds are inclusive.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.9 {
            Self::Critical
        } else if probability >= 0.7 {
            Self::High
        } else if probability >= 0.3 {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Moderate => "Moderate Risk",
            Self::High => "High Risk",
            Self::Critical => "Critical Risk",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Decoded body of a successful prediction call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResponse {
    pub prediction: DiagnosisLabel,
    /// Probability of malignancy (0.0 to 1.0)
    pub probability: f64,
    /// Weights in the order the service listed them; `None` when omitted
    pub feature_importances: Option<Vec<(String, f64)>>,
}

impl PredictionResponse {
    #[must_use]
    pub fn risk_tier(&self) -> RiskTier {
        RiskTier::from_probability(self.probability)
    }

    /// `Confidence: 12.0%`
    #[must_use]
    pub fn confidence_label(&self) -> String {
        format!("Confidence: {:.1}%", self.probability * 100.0)
    }

    /// Highest-weighted known features, at most [`TOP_IMPORTANCES`].
    #[must_use]
    pub fn top_importances(&self, schema: &FeatureSchema) -> Vec<(&'static str, f64)> {
        match &self.feature_importances {
            Some(importances) => rank_importances(importances, schema, TOP_IMPORTANCES),
            None => Vec::new(),
        }
    }
}

/// Why a success body could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("body is not JSON: {0}")]
    NotJson(String),

    #[error("body is not a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("unexpected value for `{0}`")]
    InvalidField(&'static str),
}

/// Decode a 2xx body, checking its shape before any field is trusted.
///
/// # Errors
/// Returns `DecodeError` when the body is not the expected object.
pub fn decode_prediction(body: &str) -> Result<PredictionResponse, DecodeError> {
    let value: Value = serde_json::from_str(body).map_err(|e| DecodeError::NotJson(e.to_string()))?;
    let object = value.as_object().ok_or(DecodeError::NotAnObject)?;

    let prediction = match object.get("prediction") {
        None => return Err(DecodeError::MissingField("prediction")),
        Some(Value::String(s)) if s == "Malignant" => DiagnosisLabel::Malignant,
        Some(Value::String(s)) if s == "Benign" => DiagnosisLabel::Benign,
        Some(_) => return Err(DecodeError::InvalidField("prediction")),
    };

    let probability = object
        .get("probability")
        .ok_or(DecodeError::MissingField("probability"))?
        .as_f64()
        .filter(|p| (0.0..=1.0).contains(p))
        .ok_or(DecodeError::InvalidField("probability"))?;

    let feature_importances = match object.get("feature_importances") {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => {
            let mut weights = Vec::with_capacity(map.len());
            for (name, weight) in map {
                let weight = weight
                    .as_f64()
                    .filter(|w| w.is_finite() && *w >= 0.0)
                    .ok_or(DecodeError::InvalidField("feature_importances"))?;
                weights.push((name.clone(), weight));
            }
            Some(weights)
        }
        Some(_) => return Err(DecodeError::InvalidField("feature_importances")),
    };

    Ok(PredictionResponse {
        prediction,
        probability,
        feature_importances,
    })
}

/// Rank importances by weight, descending, keeping the input order on ties.
///
/// Keys are matched by wire key, then by name; keys the schema does not know are skipped.
#[must_use]
pub fn rank_importances(
    importances: &[(String, f64)],
    schema: &FeatureSchema,
    limit: usize,
) -> Vec<(&'static str, f64)> {
    let mut known: Vec<(&'static str, f64)> = importances
        .iter()
        .filter_map(|(key, weight)| {
            schema
                .get_by_wire(key)
                .or_else(|| schema.get(key))
                .map(|spec| (spec.name, *weight))
        })
        .collect();

    // `sort_by` is stable, so equal weights keep their listed order
    known.sort_by(|a, b| b.1.total_cmp(&a.1));
    known.truncate(limit);
    known
}

/// Static guidance shown alongside the importance chart.
pub const CLINICAL_RECOMMENDATIONS: [&str; 4] = [
    "Consult with an oncologist for comprehensive evaluation",
    "Consider additional diagnostic imaging if not already performed",
    "Discuss potential biopsy options with your healthcare provider",
    "Review family history of breast cancer",
];
