//! Persistence layer for the giftgate compliance core.
//!
//! Defines the declaration and review record types, the async store
//! contracts every backend must honour (including the atomic
//! compare-and-swap review commit), an in-memory reference implementation,
//! and the append-only audit journal.

#![warn(missing_docs, clippy::pedantic)]

mod contracts;
mod error;
mod journal;
mod memory;
mod record;

pub use contracts::{ComplianceStore, DeclarationStore, ReviewStore};
pub use error::{StoreError, StoreResult};
pub use journal::{AuditEvent, AuditKind, AuditLog, FileAuditLog};
pub use memory::{InMemoryStore, StoreStats};
pub use record::{Declaration, DeclarationDraft, DeclarationDraftBuilder, DeclarationPatch, Review};
