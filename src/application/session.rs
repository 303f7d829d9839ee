//! Form session: The application context behind the form.
//!
//! Owns the schema, the live form values, the invalid-field marks, the
//! snapshot service and the submission gate. Everything here is confined to
//! the UI thread; the prediction worker only ever sees [`FeatureValues`].

use std::time::{Duration, Instant};

use crate::domain::{FeatureSchema, FeatureValues, FieldMarks, FormState, PredictionResponse, ValidationResult, Validator};
use crate::ports::KeyValueStore;

use super::prediction::PredictionError;
use super::snapshot::FormSnapshotService;

/// Whether a request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting { started_at: Instant },
}

/// Single-flight guard for prediction requests.
#[derive(Debug)]
pub struct SubmissionGate {
    phase: SubmissionPhase,
}

impl Default for SubmissionGate {
    fn default() -> Self {
        Self {
            phase: SubmissionPhase::Idle,
        }
    }
}

impl SubmissionGate {
    /// Move to `Submitting`; refused while a request is already in flight.
    ///
    /// # Errors
    /// Returns `SubmitRejected::AlreadySubmitting` if not idle.
    pub fn begin(&mut self) -> Result<(), SubmitRejected> {
        match self.phase {
            SubmissionPhase::Idle => {
                self.phase = SubmissionPhase::Submitting {
                    started_at: Instant::now(),
                };
                Ok(())
            }
            SubmissionPhase::Submitting { .. } => Err(SubmitRejected::AlreadySubmitting),
        }
    }

    /// Return to `Idle`, reporting how long the request took.
    pub fn finish(&mut self) -> Option<Duration> {
        let elapsed = match self.phase {
            SubmissionPhase::Submitting { started_at } => Some(started_at.elapsed()),
            SubmissionPhase::Idle => None,
        };
        self.phase = SubmissionPhase::Idle;
        elapsed
    }

    #[must_use]
    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, SubmissionPhase::Submitting { .. })
    }
}

/// Why a submit attempt did not start a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRejected {
    #[error("A prediction is already in progress")]
    AlreadySubmitting,

    #[error("Please correct the invalid fields before submitting")]
    InvalidFields { count: usize },
}

/// Application context for one form.
pub struct FormSession<S: KeyValueStore> {
    schema: FeatureSchema,
    form: FormState,
    marks: FieldMarks,
    snapshots: FormSnapshotService<S>,
    gate: SubmissionGate,
}

impl<S: KeyValueStore> FormSession<S> {
    /// Create a session with an empty form.
    pub fn new(schema: FeatureSchema, snapshots: FormSnapshotService<S>) -> Self {
        let form = FormState::new(&schema);
        Self {
            schema,
            form,
            marks: FieldMarks::default(),
            snapshots,
            gate: SubmissionGate::default(),
        }
    }

    /// Populate the form from the stored snapshot, if any.
    pub fn restore(&mut self) -> usize {
        self.snapshots.restore_into(&mut self.form)
    }

    #[must_use]
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    #[must_use]
    pub fn form(&self) -> &FormState {
        &self.form
    }

    #[must_use]
    pub fn marks(&self) -> &FieldMarks {
        &self.marks
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.gate.is_submitting()
    }

    /// Overwrite one value.
    pub fn set_value(&mut self, name: &str, raw: impl Into<String>) -> bool {
        self.form.set(name, raw)
    }

    /// Append a typed character to the field at `index`.
    pub fn push_char(&mut self, index: usize, c: char) {
        if let Some(value) = self.form.value_at_mut(index) {
            value.push(c);
        }
    }

    /// Remove the last character of the field at `index`.
    pub fn pop_char(&mut self, index: usize) {
        if let Some(value) = self.form.value_at_mut(index) {
            value.pop();
        }
    }

    /// Empty the field at `index`.
    pub fn clear_field(&mut self, index: usize) {
        if let Some(value) = self.form.value_at_mut(index) {
            value.clear();
        }
    }

    /// Fill the form with the sample case and drop stale marks.
    pub fn load_sample(&mut self) {
        self.form.load_sample();
        self.marks.clear_all();
    }

    /// Validate a field the user just left.
    pub fn blur(&mut self, name: &str) -> ValidationResult {
        let raw = self.form.get(name).unwrap_or_default().to_string();
        Validator::new(&self.schema).validate_field(name, &raw, &mut self.marks)
    }

    /// Validate everything, snapshot the form and open the gate.
    ///
    /// On success the caller must send the returned values and then call
    /// [`finish_submit`](Self::finish_submit).
    ///
    /// # Errors
    /// `AlreadySubmitting` while a request is in flight, `InvalidFields`
    /// when any field fails validation (all failures are marked).
    pub fn begin_submit(&mut self) -> Result<FeatureValues, SubmitRejected> {
        if self.gate.is_submitting() {
            tracing::debug!("Submit ignored: request already in flight");
            return Err(SubmitRejected::AlreadySubmitting);
        }

        let validator = Validator::new(&self.schema);
        if !validator.validate_form(&self.form, &mut self.marks) {
            let count = self.marks.count();
            tracing::info!(invalid = count, "Submit blocked by validation");
            return Err(SubmitRejected::InvalidFields { count });
        }

        // Written before the request so every attempt is kept, whatever the outcome
        self.snapshots.save_quietly(&self.form);

        let values = validator.collect(&self.form).map_err(|(name, e)| {
            tracing::warn!(feature = name, "Field failed after whole-form validation: {}", e);
            SubmitRejected::InvalidFields { count: 1 }
        })?;

        self.gate.begin()?;
        Ok(values)
    }

    /// Close the gate after the request completed, whatever the outcome.
    pub fn finish_submit(&mut self, outcome: &Result<PredictionResponse, PredictionError>) {
        let elapsed = self.gate.finish();
        match outcome {
            Ok(response) => tracing::info!(
                risk = %response.risk_tier(),
                elapsed_ms = elapsed.map(|d| d.as_millis() as u64),
                "Submission complete"
            ),
            Err(e) => tracing::warn!(
                elapsed_ms = elapsed.map(|d| d.as_millis() as u64),
                "Submission failed: {}",
                e
            ),
        }
    }
}
