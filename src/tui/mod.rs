//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a clinical-themed interface for:
//! - Measurement entry with inline validation
//! - Prediction result with risk tier
//! - Feature importance details

mod app;
mod styles;
mod ui;
mod worker;

pub use app::{App, Screen};
pub use styles::MedicalTheme;
pub use ui::{
    details::{importance_bars, ImportanceBar},
    Alert, AlertKind,
};
pub use worker::{PredictionProgress, PredictionWorker, PredictionWorkerHandle};
