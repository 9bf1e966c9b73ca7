//! In-memory reference store with indexed lookups.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use gift_primitives::{DeclarationId, DeclarationStatus, PrincipalId};
use tokio::sync::RwLock;
use tracing::debug;

use crate::contracts::{ComplianceStore, DeclarationStore, ReviewStore};
use crate::record::{Declaration, Review};
use crate::{StoreError, StoreResult};

#[derive(Debug, Default)]
struct StoreInner {
    declarations: HashMap<DeclarationId, Declaration>,
    reviews: HashMap<DeclarationId, Vec<Review>>,
    by_owner: HashMap<PrincipalId, BTreeSet<DeclarationId>>,
    by_status: HashMap<DeclarationStatus, BTreeSet<DeclarationId>>,
}

impl StoreInner {
    fn index(&mut self, declaration: &Declaration) {
        self.by_owner
            .entry(declaration.owner())
            .or_default()
            .insert(declaration.id());
        self.by_status
            .entry(declaration.status())
            .or_default()
            .insert(declaration.id());
    }

    fn unindex(&mut self, declaration: &Declaration) {
        if let Some(ids) = self.by_owner.get_mut(&declaration.owner()) {
            ids.remove(&declaration.id());
        }
        if let Some(ids) = self.by_status.get_mut(&declaration.status()) {
            ids.remove(&declaration.id());
        }
    }

    fn reindex_status(
        &mut self,
        id: DeclarationId,
        from: DeclarationStatus,
        to: DeclarationStatus,
    ) {
        if let Some(ids) = self.by_status.get_mut(&from) {
            ids.remove(&id);
        }
        self.by_status.entry(to).or_default().insert(id);
    }
}

/// In-memory implementation of the store contracts.
///
/// Both logical collections live behind one lock so the review commit can
/// apply its two writes as a single unit.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns utilisation statistics.
    pub async fn stats(&self) -> StoreStats {
        let guard = self.inner.read().await;
        StoreStats {
            declarations: guard.declarations.len(),
            reviews: guard.reviews.values().map(Vec::len).sum(),
        }
    }
}

/// Snapshot describing store utilisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Declarations currently stored.
    pub declarations: usize,
    /// Review rows currently stored.
    pub reviews: usize,
}

#[async_trait]
impl DeclarationStore for InMemoryStore {
    async fn insert(&self, declaration: Declaration) -> StoreResult<Declaration> {
        let mut guard = self.inner.write().await;
        if guard.declarations.contains_key(&declaration.id()) {
            return Err(StoreError::InvalidRecord("duplicate declaration id"));
        }
        guard.index(&declaration);
        guard
            .declarations
            .insert(declaration.id(), declaration.clone());
        Ok(declaration)
    }

    async fn get(&self, id: DeclarationId) -> StoreResult<Option<Declaration>> {
        let guard = self.inner.read().await;
        Ok(guard.declarations.get(&id).cloned())
    }

    async fn replace(&self, mut declaration: Declaration) -> StoreResult<Declaration> {
        let mut guard = self.inner.write().await;
        let Some(stored) = guard.declarations.get(&declaration.id()) else {
            return Err(StoreError::Missing {
                id: declaration.id(),
            });
        };
        if stored.revision() != declaration.revision() {
            return Err(StoreError::RevisionConflict {
                expected: declaration.revision(),
                actual: stored.revision(),
            });
        }
        let previous_status = stored.status();
        declaration.bump_revision();
        if previous_status != declaration.status() {
            guard.reindex_status(declaration.id(), previous_status, declaration.status());
        }
        guard
            .declarations
            .insert(declaration.id(), declaration.clone());
        Ok(declaration)
    }

    async fn set_status(
        &self,
        id: DeclarationId,
        expected: DeclarationStatus,
        next: DeclarationStatus,
    ) -> StoreResult<Declaration> {
        let mut guard = self.inner.write().await;
        let Some(stored) = guard.declarations.get_mut(&id) else {
            return Err(StoreError::Missing { id });
        };
        if stored.status() != expected {
            return Err(StoreError::StatusConflict {
                expected,
                actual: stored.status(),
            });
        }
        stored.set_status(next);
        stored.bump_revision();
        let updated = stored.clone();
        guard.reindex_status(id, expected, next);
        debug!(declaration = %id, from = ?expected, to = ?next, "status transition committed");
        Ok(updated)
    }

    async fn remove(&self, id: DeclarationId) -> StoreResult<Declaration> {
        let mut guard = self.inner.write().await;
        let Some(declaration) = guard.declarations.remove(&id) else {
            return Err(StoreError::Missing { id });
        };
        guard.unindex(&declaration);
        Ok(declaration)
    }

    async fn list_by_owner(&self, owner: PrincipalId) -> StoreResult<Vec<Declaration>> {
        let guard = self.inner.read().await;
        let Some(ids) = guard.by_owner.get(&owner) else {
            return Ok(Vec::new());
        };
        Ok(ids
            .iter()
            .filter_map(|id| guard.declarations.get(id).cloned())
            .collect())
    }

    async fn list_by_status(
        &self,
        statuses: &[DeclarationStatus],
    ) -> StoreResult<Vec<Declaration>> {
        let guard = self.inner.read().await;
        let mut ids = BTreeSet::new();
        for status in statuses {
            if let Some(indexed) = guard.by_status.get(status) {
                ids.extend(indexed.iter().copied());
            }
        }
        Ok(ids
            .iter()
            .filter_map(|id| guard.declarations.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl ReviewStore for InMemoryStore {
    async fn append(&self, review: Review) -> StoreResult<Review> {
        let mut guard = self.inner.write().await;
        if !guard.declarations.contains_key(&review.declaration_id()) {
            return Err(StoreError::Missing {
                id: review.declaration_id(),
            });
        }
        guard
            .reviews
            .entry(review.declaration_id())
            .or_default()
            .push(review.clone());
        Ok(review)
    }

    async fn list_for(&self, declaration: DeclarationId) -> StoreResult<Vec<Review>> {
        let guard = self.inner.read().await;
        Ok(guard.reviews.get(&declaration).cloned().unwrap_or_default())
    }

    async fn remove_for(&self, declaration: DeclarationId) -> StoreResult<usize> {
        let mut guard = self.inner.write().await;
        Ok(guard.reviews.remove(&declaration).map_or(0, |rows| rows.len()))
    }
}

#[async_trait]
impl ComplianceStore for InMemoryStore {
    async fn commit_review(
        &self,
        review: Review,
        expected: DeclarationStatus,
        next: DeclarationStatus,
    ) -> StoreResult<Declaration> {
        let mut guard = self.inner.write().await;
        let id = review.declaration_id();
        let Some(stored) = guard.declarations.get_mut(&id) else {
            return Err(StoreError::Missing { id });
        };
        if stored.status() != expected {
            return Err(StoreError::StatusConflict {
                expected,
                actual: stored.status(),
            });
        }
        stored.set_status(next);
        stored.bump_revision();
        let updated = stored.clone();
        guard.reindex_status(id, expected, next);
        guard.reviews.entry(id).or_default().push(review);
        debug!(declaration = %id, from = ?expected, to = ?next, "review committed");
        Ok(updated)
    }
}
