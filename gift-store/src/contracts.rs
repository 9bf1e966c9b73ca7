//! Async store contracts every persistence backend must honour.

use async_trait::async_trait;
use gift_primitives::{DeclarationId, DeclarationStatus, PrincipalId};

use crate::record::{Declaration, Review};
use crate::StoreResult;

/// Persisted gift declarations, keyed by identifier with secondary lookups
/// by owner and by status.
#[async_trait]
pub trait DeclarationStore: Send + Sync {
    /// Inserts a freshly created declaration.
    async fn insert(&self, declaration: Declaration) -> StoreResult<Declaration>;

    /// Fetches a declaration by identifier. Absence is `Ok(None)`, not an
    /// error; visibility is the caller's concern.
    async fn get(&self, id: DeclarationId) -> StoreResult<Option<Declaration>>;

    /// Replaces a declaration's content, guarded by its revision counter.
    ///
    /// Fails with [`StoreError::RevisionConflict`](crate::StoreError) when
    /// the stored revision no longer matches the one carried by `declaration`.
    async fn replace(&self, declaration: Declaration) -> StoreResult<Declaration>;

    /// Compare-and-swap on the declaration status.
    ///
    /// Fails with [`StoreError::StatusConflict`](crate::StoreError) when the
    /// stored status is not `expected` at commit time.
    async fn set_status(
        &self,
        id: DeclarationId,
        expected: DeclarationStatus,
        next: DeclarationStatus,
    ) -> StoreResult<Declaration>;

    /// Permanently removes a declaration, returning the removed record.
    async fn remove(&self, id: DeclarationId) -> StoreResult<Declaration>;

    /// Returns all declarations owned by the given principal.
    async fn list_by_owner(&self, owner: PrincipalId) -> StoreResult<Vec<Declaration>>;

    /// Returns all declarations whose status is in `statuses`.
    async fn list_by_status(
        &self,
        statuses: &[DeclarationStatus],
    ) -> StoreResult<Vec<Declaration>>;
}

/// Persisted compliance reviews. Append-mostly: reviews are immutable once
/// written and only removed when their declaration is deleted.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Appends a review.
    async fn append(&self, review: Review) -> StoreResult<Review>;

    /// Returns all reviews bound to the given declaration, oldest first.
    async fn list_for(&self, declaration: DeclarationId) -> StoreResult<Vec<Review>>;

    /// Removes every review bound to the given declaration (cascade on
    /// declaration deletion), returning how many were removed.
    async fn remove_for(&self, declaration: DeclarationId) -> StoreResult<usize>;
}

/// Combined store exposing the atomic review commit.
///
/// `commit_review` is the concurrency-control point of the whole system: the
/// review append and the status transition happen as one unit or not at all,
/// and the transition only commits when the status observed at decision time
/// still holds. No two commits can both succeed from the same observed
/// status.
#[async_trait]
pub trait ComplianceStore: DeclarationStore + ReviewStore {
    /// Atomically appends `review` and moves its declaration from
    /// `expected` to `next`.
    ///
    /// Fails with [`StoreError::StatusConflict`](crate::StoreError) when the
    /// declaration's status has moved since `expected` was observed, and with
    /// [`StoreError::Missing`](crate::StoreError) when the declaration does
    /// not exist. On failure nothing is written.
    async fn commit_review(
        &self,
        review: Review,
        expected: DeclarationStatus,
        next: DeclarationStatus,
    ) -> StoreResult<Declaration>;
}
