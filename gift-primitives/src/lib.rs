//! Shared vocabulary for the giftgate compliance core.
//!
//! This crate defines the identifier newtypes, the principal/role model, and
//! the status enums that every other giftgate crate builds on. It carries no
//! storage or policy logic of its own.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod ids;
mod principal;
mod status;

pub use error::{Error, Result};
pub use ids::{DeclarationId, PrincipalId, ReviewId};
pub use principal::{Principal, Role};
pub use status::{DeclarationStatus, Direction, GiftType, ReviewDecision};
