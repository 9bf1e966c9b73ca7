//! Gift-declaration compliance core facade.
//!
//! Depend on this crate via `cargo add giftgate`. It bundles the internal
//! workspace crates behind feature flags so embedders can enable or disable
//! components as needed.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use gift_primitives as primitives;

/// Role-scoped access policy (enabled by `policy` feature).
#[cfg(feature = "policy")]
pub use gift_policy as policy;

/// Declaration and review stores plus the audit journal (enabled by `store`
/// feature).
#[cfg(feature = "store")]
pub use gift_store as store;

/// Lifecycle workflow engine and projections (enabled by `workflow`
/// feature).
#[cfg(feature = "workflow")]
pub use gift_workflow as workflow;

/// Runtime configuration (enabled by `config` feature).
#[cfg(feature = "config")]
pub use gift_config as config;

/// Structured logging bootstrap (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use gift_telemetry as telemetry;
