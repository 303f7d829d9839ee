//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod prediction;
mod session;
mod snapshot;

pub use prediction::{PredictionClient, PredictionError};
pub use session::{FormSession, SubmissionGate, SubmissionPhase, SubmitRejected};
pub use snapshot::{FormSnapshotService, SnapshotError, SNAPSHOT_KEY};

#[cfg(test)]
pub(crate) use prediction::tests as prediction_fakes;
