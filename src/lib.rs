//! # Oncolens
//!
//! Terminal client for breast-tumour cytology risk prediction.
//!
//! This crate provides:
//! - A static schema of cytology measurements with soft validation bounds
//! - A form session that validates, snapshots and submits measurements
//! - An HTTP client for the remote prediction service
//! - Terminal UI rendering of diagnosis, risk tier and feature importances
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (schema, form state, validation, prediction results)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (SQLite, ureq, log sanitizing)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use config::AppConfig;
pub use domain::{DiagnosisLabel, FeatureSchema, FeatureSpec, FormState, PredictionResponse, RiskTier};

/// Result type for Oncolens operations
pub type Result<T> = std::result::Result<T, OncolensError>;

/// Main error type for Oncolens
#[derive(Debug, thiserror::Error)]
pub enum OncolensError {
    #[error("Storage operation failed: {0}")]
    Storage(#[from] adapters::StorageError),

    #[error("Prediction failed: {0}")]
    Prediction(#[from] application::PredictionError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
