//! Error types for storage backends.

use thiserror::Error;

/// Errors a storage backend can report.
///
/// Callers on the UI path normally go through the lenient [`crate::Store`]
/// helpers and never see these; they exist for backends that can actually
/// fail (quota, serialization) and for tests.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying backend rejected the operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored value could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
