//! Identity resolution boundary.
//!
//! The engine takes `&Principal` explicitly on every call; this trait is the
//! seam where an embedding application resolves a session token into one.

use std::collections::HashMap;

use async_trait::async_trait;
use gift_primitives::Principal;
use tokio::sync::RwLock;

use crate::{WorkflowError, WorkflowResult};

/// Resolves an opaque credential into a [`Principal`].
///
/// Implementations sit in front of whatever identity backend the deployment
/// uses. Resolution failure is an authorization error, never a panic.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves `token` into the principal it authenticates.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Authorization`] for unknown or expired
    /// tokens.
    async fn resolve(&self, token: &str) -> WorkflowResult<Principal>;
}

/// In-memory token map, for tests and demos.
#[derive(Default)]
pub struct StaticIdentity {
    principals: RwLock<HashMap<String, Principal>>,
}

impl StaticIdentity {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `principal` under `token`, replacing any previous entry.
    pub async fn register(&self, token: impl Into<String>, principal: Principal) {
        self.principals.write().await.insert(token.into(), principal);
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn resolve(&self, token: &str) -> WorkflowResult<Principal> {
        self.principals
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(WorkflowError::denied)
    }
}
