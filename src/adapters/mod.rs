//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `http`: ureq for the prediction request
//! - `sqlite`: SQLite for local storage
//! - `sanitize`: measurement and secret filtering for logs

pub mod http;
pub mod sanitize;
pub mod sqlite;

// Re-export adapter errors for lib.rs
pub use http::TransportError;
pub use sqlite::StorageError;
