//! Error types for the persistence layer.

use gift_primitives::{DeclarationId, DeclarationStatus};
use serde_json::Error as SerdeError;
use thiserror::Error;

/// Errors emitted by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record or patch failed validation before it reached storage.
    #[error("invalid record: {0}")]
    InvalidRecord(&'static str),

    /// The referenced declaration does not exist.
    #[error("declaration {id} not found")]
    Missing {
        /// Identifier that failed to resolve.
        id: DeclarationId,
    },

    /// A status compare-and-swap observed a different current status.
    #[error("status changed concurrently: expected {expected:?}, found {actual:?}")]
    StatusConflict {
        /// Status the caller observed when deciding.
        expected: DeclarationStatus,
        /// Status found at commit time.
        actual: DeclarationStatus,
    },

    /// A content replace observed a different record revision.
    #[error("record changed concurrently: expected revision {expected}, found {actual}")]
    RevisionConflict {
        /// Revision the caller read.
        expected: u64,
        /// Revision found at commit time.
        actual: u64,
    },

    /// The backend is temporarily unreachable. Retryable.
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// Human-readable context provided by the backend.
        reason: String,
    },

    /// Underlying I/O failure while reading or writing journal files.
    #[error("i/o error: {source}")]
    Io {
        /// Source [`std::io::Error`].
        #[from]
        source: std::io::Error,
    },

    /// Serialization or deserialization error.
    #[error("serialization error: {source}")]
    Serialization {
        /// Source [`serde_json::Error`].
        #[from]
        source: SerdeError,
    },
}

impl StoreError {
    /// Helper to construct unavailability errors from string-like values.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
