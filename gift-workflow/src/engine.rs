//! The workflow engine: policy-gated operations on declarations and reviews.

use std::sync::Arc;

use gift_policy::{AccessPolicy, AccessRequest, PolicyAction, ResourceRef};
use gift_primitives::{
    DeclarationId, DeclarationStatus, Principal, ReviewDecision, Role,
};
use gift_store::{
    AuditEvent, AuditKind, AuditLog, ComplianceStore, Declaration, DeclarationDraft,
    DeclarationPatch, Review,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::status;
use crate::{WorkflowError, WorkflowResult};

/// Validates and applies declaration lifecycle operations.
///
/// Every operation takes the acting principal explicitly and consults the
/// access policy before the store is touched; there is no ambient identity.
pub struct WorkflowEngine {
    store: Arc<dyn ComplianceStore>,
    policy: AccessPolicy,
    audit: Option<Arc<dyn AuditLog>>,
}

impl WorkflowEngine {
    /// Creates an engine over the given store with the standard policy.
    #[must_use]
    pub fn new(store: Arc<dyn ComplianceStore>) -> Self {
        Self {
            store,
            policy: AccessPolicy::standard(),
            audit: None,
        }
    }

    /// Replaces the access policy.
    #[must_use]
    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Attaches an audit log. Review decisions, status overrides, and
    /// deletions are appended to it.
    #[must_use]
    pub fn with_audit_log(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Returns the active access policy.
    #[must_use]
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    fn authorize(
        &self,
        principal: &Principal,
        action: PolicyAction,
        resource: ResourceRef,
    ) -> WorkflowResult<()> {
        let decision = self
            .policy
            .evaluate(&AccessRequest::new(principal, action, resource));
        if decision.is_deny() {
            return Err(WorkflowError::Authorization {
                reason: decision.reason().unwrap_or("not permitted").to_owned(),
            });
        }
        Ok(())
    }

    /// Fetches a declaration, conflating invisibility with absence: a
    /// principal that may not read the record learns nothing beyond "not
    /// found".
    async fn fetch_visible(
        &self,
        principal: &Principal,
        id: DeclarationId,
    ) -> WorkflowResult<Declaration> {
        let Some(declaration) = self.store.get(id).await? else {
            return Err(WorkflowError::NotFound { id });
        };
        let decision = self.policy.evaluate(&AccessRequest::new(
            principal,
            PolicyAction::Read,
            ResourceRef::Declaration {
                owner: declaration.owner(),
            },
        ));
        if decision.is_deny() {
            return Err(WorkflowError::NotFound { id });
        }
        Ok(declaration)
    }

    async fn record_audit(&self, event: AuditEvent) {
        let Some(audit) = &self.audit else {
            return;
        };
        // The mutation has already committed; an audit outage must not
        // unwind it. Surface loudly instead.
        if let Err(err) = audit.append(&event).await {
            warn!(?err, kind = ?event.kind(), declaration = %event.declaration(), "audit append failed");
        }
    }

    /// Creates a declaration owned by the principal, in `Submitted` status.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Authorization`] when the principal may not
    /// create declarations, or a store error on persistence failure.
    /// Validation of the draft's fields happens at build time.
    pub async fn create_declaration(
        &self,
        principal: &Principal,
        draft: DeclarationDraft,
    ) -> WorkflowResult<Declaration> {
        self.authorize(
            principal,
            PolicyAction::Create,
            ResourceRef::Declaration {
                owner: principal.id(),
            },
        )?;

        let declaration = Declaration::from_draft(principal.id(), draft);
        let stored = self.store.insert(declaration).await?;
        info!(
            declaration = %stored.id(),
            owner = %stored.owner(),
            gift_type = ?stored.gift_type(),
            "declaration submitted"
        );
        Ok(stored)
    }

    /// Fetches a declaration visible to the principal.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::NotFound`] when the declaration is absent or
    /// not visible to the principal.
    pub async fn get_declaration(
        &self,
        principal: &Principal,
        id: DeclarationId,
    ) -> WorkflowResult<Declaration> {
        self.fetch_visible(principal, id).await
    }

    /// Applies a content patch to the principal's own declaration.
    ///
    /// Only the owner edits content, and only while the declaration is
    /// non-terminal. Compliance and Admin change nothing through this path;
    /// their one direct write is [`WorkflowEngine::override_status`].
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::NotFound`] for absent/invisible records,
    /// [`WorkflowError::Authorization`] for non-owners,
    /// [`WorkflowError::InvalidTransition`] for terminal records,
    /// [`WorkflowError::Validation`] for bad patch fields, and
    /// [`WorkflowError::ConcurrentModification`] when the record changed
    /// since it was read.
    pub async fn update_declaration(
        &self,
        principal: &Principal,
        id: DeclarationId,
        patch: DeclarationPatch,
    ) -> WorkflowResult<Declaration> {
        let mut declaration = self.fetch_visible(principal, id).await?;
        self.authorize(
            principal,
            PolicyAction::Update,
            ResourceRef::Declaration {
                owner: declaration.owner(),
            },
        )?;
        if declaration.owner() != principal.id() {
            return Err(WorkflowError::denied());
        }
        if declaration.status().is_terminal() {
            return Err(WorkflowError::InvalidTransition {
                from: declaration.status(),
                detail: "content updates are not permitted on terminal declarations".into(),
            });
        }

        declaration.apply_patch(patch)?;
        let stored = self.store.replace(declaration).await?;
        debug!(declaration = %stored.id(), revision = stored.revision(), "declaration updated");
        Ok(stored)
    }

    /// Records a review decision and atomically moves the declaration
    /// status along the decision mapping.
    ///
    /// The commit is a compare-and-swap on the status observed here: if
    /// another reviewer lands first, this call fails with
    /// [`WorkflowError::ConcurrentModification`] and the caller must
    /// re-fetch and decide against the fresh state.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::NotFound`] when the declaration is absent,
    /// [`WorkflowError::Authorization`] when the principal lacks review
    /// rights or owns the declaration,
    /// [`WorkflowError::InvalidTransition`] when the status no longer
    /// accepts reviews, and [`WorkflowError::ConcurrentModification`] on a
    /// lost race.
    pub async fn record_review(
        &self,
        principal: &Principal,
        id: DeclarationId,
        decision: ReviewDecision,
        comment: Option<String>,
    ) -> WorkflowResult<(Declaration, Review)> {
        let Some(declaration) = self.store.get(id).await? else {
            return Err(WorkflowError::NotFound { id });
        };
        self.authorize(
            principal,
            PolicyAction::Create,
            ResourceRef::Review {
                declaration_owner: declaration.owner(),
            },
        )?;
        // Nobody reviews their own declaration, whatever their roles.
        if declaration.owner() == principal.id() {
            return Err(WorkflowError::denied());
        }

        let from = declaration.status();
        let next = status::review_transition(from, decision)?;

        let mut review = Review::new(id, principal.id(), decision);
        if let Some(comment) = comment {
            review = review.with_comment(comment);
        }

        let updated = self
            .store
            .commit_review(review.clone(), from, next)
            .await?;
        info!(
            declaration = %id,
            reviewer = %principal.id(),
            ?decision,
            to = ?next,
            "review recorded"
        );
        self.record_audit(
            AuditEvent::new(AuditKind::ReviewDecision, id, principal.id())
                .with_detail("decision", Value::from(decision.as_str()))
                .with_detail("from", Value::from(from.as_str()))
                .with_detail("to", Value::from(next.as_str())),
        )
        .await;
        Ok((updated, review))
    }

    /// Directly sets a declaration's status, bypassing the review flow.
    ///
    /// This is the administrative escape hatch: the only path into
    /// `Escalated`, and the only way out of a terminal status. Requires
    /// Compliance or Admin; every use lands in the audit trail as an
    /// `admin_override`, distinct from review decisions.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::NotFound`] for absent/invisible records,
    /// [`WorkflowError::Authorization`] without Compliance/Admin,
    /// [`WorkflowError::InvalidTransition`] for targets outside the
    /// lifecycle graph (no-ops and `Draft` included), and
    /// [`WorkflowError::ConcurrentModification`] on a lost race.
    pub async fn override_status(
        &self,
        principal: &Principal,
        id: DeclarationId,
        next: DeclarationStatus,
    ) -> WorkflowResult<Declaration> {
        let declaration = self.fetch_visible(principal, id).await?;
        self.authorize(
            principal,
            PolicyAction::Update,
            ResourceRef::Declaration {
                owner: declaration.owner(),
            },
        )?;
        // The owner's update grant covers content, not status.
        if !principal.holds(Role::Compliance) && !principal.holds(Role::Admin) {
            return Err(WorkflowError::denied());
        }

        let from = declaration.status();
        if !status::override_allowed(from, next) {
            return Err(WorkflowError::InvalidTransition {
                from,
                detail: format!("status override to {next:?} is not permitted"),
            });
        }

        let updated = self.store.set_status(id, from, next).await?;
        warn!(
            declaration = %id,
            actor = %principal.id(),
            from = ?from,
            to = ?next,
            "administrative status override"
        );
        self.record_audit(
            AuditEvent::new(AuditKind::AdminOverride, id, principal.id())
                .with_detail("from", Value::from(from.as_str()))
                .with_detail("to", Value::from(next.as_str())),
        )
        .await;
        Ok(updated)
    }

    /// Permanently deletes a declaration and cascades its reviews.
    ///
    /// Admin only: deletion is a destructive override outside the normal
    /// lifecycle, so the owner's policy-level delete grant is deliberately
    /// not honoured here.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::NotFound`] for absent/invisible records and
    /// [`WorkflowError::Authorization`] for non-admins.
    pub async fn delete_declaration(
        &self,
        principal: &Principal,
        id: DeclarationId,
    ) -> WorkflowResult<Declaration> {
        let declaration = self.fetch_visible(principal, id).await?;
        if !principal.holds(Role::Admin) {
            return Err(WorkflowError::denied());
        }
        self.authorize(
            principal,
            PolicyAction::Delete,
            ResourceRef::Declaration {
                owner: declaration.owner(),
            },
        )?;

        let removed = self.store.remove(id).await?;
        let cascaded = self.store.remove_for(id).await?;
        warn!(declaration = %id, actor = %principal.id(), cascaded, "declaration deleted");
        self.record_audit(
            AuditEvent::new(AuditKind::Deletion, id, principal.id())
                .with_detail("reviews_removed", Value::from(cascaded)),
        )
        .await;
        Ok(removed)
    }

    /// Lists the reviews recorded against a declaration.
    ///
    /// Visible to reviewers and to the declaration's owner; for anyone else
    /// the declaration does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::NotFound`] when the declaration is absent or
    /// its reviews are not visible to the principal.
    pub async fn list_reviews_for(
        &self,
        principal: &Principal,
        id: DeclarationId,
    ) -> WorkflowResult<Vec<Review>> {
        let Some(declaration) = self.store.get(id).await? else {
            return Err(WorkflowError::NotFound { id });
        };
        let decision = self.policy.evaluate(&AccessRequest::new(
            principal,
            PolicyAction::Read,
            ResourceRef::Review {
                declaration_owner: declaration.owner(),
            },
        ));
        if decision.is_deny() {
            return Err(WorkflowError::NotFound { id });
        }
        Ok(self.store.list_for(id).await?)
    }

    pub(crate) fn store(&self) -> &Arc<dyn ComplianceStore> {
        &self.store
    }
}
