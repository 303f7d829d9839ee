//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (HTTP, local storage).

mod key_value_store;
mod prediction_transport;

pub use key_value_store::KeyValueStore;
pub use prediction_transport::{PredictionTransport, TransportResponse};
