//! Declaration lifecycle workflow for the giftgate compliance core.
//!
//! The [`WorkflowEngine`] is the only sanctioned write path: every operation
//! takes the acting [`gift_primitives::Principal`] explicitly, consults the
//! access policy before touching the store, and validates status transitions
//! against the lifecycle rules in [`status`]. Read-side projections live in
//! [`queries`], and [`identity`] holds the seam where embedders resolve
//! credentials into principals.

#![warn(missing_docs, clippy::pedantic)]

mod engine;
mod error;
mod identity;
mod queries;
pub mod status;

pub use engine::WorkflowEngine;
pub use error::{WorkflowError, WorkflowResult};
pub use identity::{IdentityProvider, StaticIdentity};
pub use queries::{DeclarationStats, compute_stats};
