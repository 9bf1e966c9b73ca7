//! Access policy evaluation for the giftgate compliance core.
//!
//! The engine is a pure function from `(principal, action, resource)` to an
//! allow/deny decision. It never touches storage: callers resolve the target
//! resource first and hand its ownership facts to the evaluator, so policy can
//! be unit-tested in isolation and consulted before any store is reached.

#![warn(missing_docs, clippy::pedantic)]

mod contracts;
mod decision;
mod engine;

pub use contracts::{AccessRequest, PolicyAction, ResourceKind, ResourceRef};
pub use decision::{DecisionKind, PolicyDecision};
pub use engine::{AccessPolicy, ActorMatcher, PolicyError, PolicyResult, PolicyRule};
