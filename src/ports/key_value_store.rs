//! Key-value store port: Trait for local persistence.
//!
//! This trait abstracts the storage backend (SQLite) from the application logic.

/// Trait for a small local key-value store.
///
/// Values are opaque text; callers own their encoding.
pub trait KeyValueStore: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the value stored under `key`.
    ///
    /// # Returns
    /// `None` if nothing is stored.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn put(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}
