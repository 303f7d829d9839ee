//! Domain layer: Core types and logic.
//!
//! This module contains pure Rust types with no I/O.
//! Everything the UI and the network layer exchange is defined here.

mod form;
mod prediction;
mod schema;
mod validation;

pub use form::{FeatureValues, FormState, SAMPLE_CASE};
pub use prediction::{
    decode_prediction, rank_importances, DecodeError, DiagnosisLabel, PredictionResponse,
    RiskTier, CLINICAL_RECOMMENDATIONS, TOP_IMPORTANCES,
};
pub use schema::{display_label, FeatureSchema, FeatureSpec, SchemaVariant};
pub use validation::{check_value, FieldMarks, ValidationError, ValidationResult, Validator};
