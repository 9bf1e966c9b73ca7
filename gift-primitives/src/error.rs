//! Shared error definitions for giftgate primitives.

use thiserror::Error;
use uuid::Error as UuidError;

/// Result alias used throughout the primitive types.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while manipulating primitive types.
#[derive(Debug, Error)]
pub enum Error {
    /// The provided identifier could not be parsed as a UUID.
    #[error("invalid identifier: {source}")]
    InvalidId {
        /// Source parsing error from the UUID library.
        #[from]
        source: UuidError,
    },

    /// The provided role name is not recognised.
    #[error("unknown role `{value}`")]
    UnknownRole {
        /// The offending role string.
        value: String,
    },
}
