//! Error types for the context crate.

use thiserror::Error;

/// Errors from the trust store and memory persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Loading or saving a memory record failed.
    ///
    /// Callers degrade gracefully: a failed load substitutes a default
    /// memory context, a failed save is logged and the cached state
    /// remains authoritative.
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// A memory record could not be serialized or deserialized.
    #[error("Serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}
