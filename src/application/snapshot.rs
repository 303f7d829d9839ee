//! Form snapshot service: Saves and restores raw form values.
//!
//! The snapshot is a JSON object `{feature_name: raw_text}` stored under a
//! single fixed key.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::FormState;
use crate::ports::KeyValueStore;

/// Key the snapshot is stored under.
pub const SNAPSHOT_KEY: &str = "prediction_form";

/// Error type for snapshot operations.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Snapshot store failed: {0}")]
    Store(String),

    #[error("Snapshot is corrupt: {0}")]
    Corrupt(String),
}

/// Service persisting [`FormState`] through a [`KeyValueStore`].
pub struct FormSnapshotService<S: KeyValueStore> {
    store: Arc<S>,
}

impl<S: KeyValueStore> FormSnapshotService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Read the stored snapshot.
    ///
    /// String values are taken as-is and numbers are kept in their textual
    /// form; other value types are skipped.
    ///
    /// # Errors
    /// Returns `SnapshotError` if the store fails or the snapshot is not a
    /// JSON object.
    pub fn load(&self) -> Result<Option<BTreeMap<String, String>>, SnapshotError> {
        let Some(raw) = self
            .store
            .get(SNAPSHOT_KEY)
            .map_err(|e| SnapshotError::Store(e.to_string()))?
        else {
            return Ok(None);
        };

        let value: Value = serde_json::from_str(&raw).map_err(|e| SnapshotError::Corrupt(e.to_string()))?;
        let Value::Object(map) = value else {
            return Err(SnapshotError::Corrupt("expected a JSON object".to_string()));
        };

        let snapshot = map
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::String(s) => Some((name, s)),
                Value::Number(n) => Some((name, n.to_string())),
                _ => None,
            })
            .collect();

        Ok(Some(snapshot))
    }

    /// Write every raw value of the form.
    ///
    /// # Errors
    /// Returns `SnapshotError` if the store fails.
    pub fn save(&self, form: &FormState) -> Result<(), SnapshotError> {
        let json = serde_json::to_string(&form.snapshot()).map_err(|e| SnapshotError::Corrupt(e.to_string()))?;
        self.store
            .put(SNAPSHOT_KEY, &json)
            .map_err(|e| SnapshotError::Store(e.to_string()))
    }

    /// Restore a form from the stored snapshot.
    ///
    /// Failures are logged and swallowed: a missing or corrupt snapshot must
    /// never block the form. Returns how many fields were restored.
    pub fn restore_into(&self, form: &mut FormState) -> usize {
        match self.load() {
            Ok(Some(snapshot)) => {
                let restored = form.restore(&snapshot);
                tracing::info!(restored, "Restored form snapshot");
                restored
            }
            Ok(None) => 0,
            Err(e) => {
                tracing::warn!("Failed to restore form snapshot: {}", e);
                0
            }
        }
    }

    /// Save, logging instead of failing.
    pub fn save_quietly(&self, form: &FormState) {
        if let Err(e) = self.save(form) {
            tracing::warn!("Failed to save form snapshot: {}", e);
        }
    }
}
