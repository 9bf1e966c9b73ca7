//! Workflow error taxonomy.
//!
//! Every operation returns a typed outcome the caller must branch on.
//! Nothing here is fatal to the process: validation and authorization
//! failures need correction, conflicts and outages are retryable.

use gift_primitives::{DeclarationId, DeclarationStatus};
use gift_store::StoreError;
use thiserror::Error;

/// Result alias for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Errors surfaced by the workflow engine.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Malformed or missing input. Local, never retried.
    #[error("validation failed: {0}")]
    Validation(&'static str),

    /// Policy denied the action. The reason stays generic so a denial does
    /// not reveal whether the resource exists.
    #[error("not permitted: {reason}")]
    Authorization {
        /// Generic, non-revealing explanation.
        reason: String,
    },

    /// The declaration is absent, or invisible to the principal: read-path
    /// denials are conflated with absence so that existence never leaks.
    #[error("declaration {id} not found")]
    NotFound {
        /// Identifier that failed to resolve.
        id: DeclarationId,
    },

    /// The attempted transition is not legal from the current status.
    #[error("invalid transition from {from:?}: {detail}")]
    InvalidTransition {
        /// Status the declaration was in.
        from: DeclarationStatus,
        /// What was attempted and why it is not legal.
        detail: String,
    },

    /// The declaration changed between decision and commit. The caller
    /// should re-fetch and retry against the fresh state.
    #[error("concurrent modification: {reason}")]
    ConcurrentModification {
        /// What the compare-and-swap observed.
        reason: String,
    },

    /// The store is temporarily unreachable. Retryable with backoff.
    #[error("store unavailable: {reason}")]
    StoreUnavailable {
        /// Human-readable context from the backend.
        reason: String,
    },
}

impl WorkflowError {
    /// Returns a generic authorization denial.
    #[must_use]
    pub fn denied() -> Self {
        Self::Authorization {
            reason: "not permitted".into(),
        }
    }

    /// Returns `true` when the caller may retry the operation as-is (after
    /// a re-fetch for conflicts, with backoff for outages).
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConcurrentModification { .. } | Self::StoreUnavailable { .. }
        )
    }
}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidRecord(message) => Self::Validation(message),
            StoreError::Missing { id } => Self::NotFound { id },
            StoreError::StatusConflict { expected, actual } => Self::ConcurrentModification {
                reason: format!("expected status {expected:?}, found {actual:?}"),
            },
            StoreError::RevisionConflict { expected, actual } => Self::ConcurrentModification {
                reason: format!("expected revision {expected}, found {actual}"),
            },
            StoreError::Unavailable { reason } => Self::StoreUnavailable { reason },
            StoreError::Io { source } => Self::StoreUnavailable {
                reason: source.to_string(),
            },
            StoreError::Serialization { source } => Self::StoreUnavailable {
                reason: source.to_string(),
            },
        }
    }
}
