//! Read-side projections over the declaration store.

use gift_primitives::{DeclarationStatus, Principal, Role};
use gift_store::Declaration;
use tracing::debug;

use crate::engine::WorkflowEngine;
use crate::{WorkflowError, WorkflowResult};

/// Aggregate counters over a set of declarations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclarationStats {
    /// Total declarations in the set.
    pub total: usize,
    /// Declarations still awaiting a decision (`Submitted` or `UnderReview`).
    pub pending: usize,
    /// Declarations approved.
    pub approved: usize,
    /// Sum of estimated values across the set, in minor currency units.
    pub total_value: u64,
}

/// Folds a slice of declarations into aggregate counters.
///
/// Pure and store-agnostic so callers can aggregate any slice they already
/// hold, typically the output of [`WorkflowEngine::list_mine`].
#[must_use]
pub fn compute_stats(declarations: &[Declaration]) -> DeclarationStats {
    let mut stats = DeclarationStats {
        total: declarations.len(),
        ..DeclarationStats::default()
    };
    for declaration in declarations {
        match declaration.status() {
            DeclarationStatus::Submitted | DeclarationStatus::UnderReview => stats.pending += 1,
            DeclarationStatus::Approved => stats.approved += 1,
            _ => {}
        }
        stats.total_value = stats.total_value.saturating_add(declaration.estimated_value());
    }
    stats
}

impl WorkflowEngine {
    /// Lists the principal's own declarations, newest first.
    ///
    /// # Errors
    ///
    /// Propagates store failures as [`WorkflowError::StoreUnavailable`].
    pub async fn list_mine(&self, principal: &Principal) -> WorkflowResult<Vec<Declaration>> {
        let mut declarations = self.store().list_by_owner(principal.id()).await?;
        declarations.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(declarations)
    }

    /// Lists declarations awaiting a decision, oldest first so the longest
    /// waiters surface at the top of the queue. `limit` caps the page size.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Authorization`] unless the principal holds
    /// Compliance or Admin.
    pub async fn list_pending_review(
        &self,
        principal: &Principal,
        limit: usize,
    ) -> WorkflowResult<Vec<Declaration>> {
        if !principal.holds(Role::Compliance) && !principal.holds(Role::Admin) {
            return Err(WorkflowError::denied());
        }

        let mut declarations = self
            .store()
            .list_by_status(&[DeclarationStatus::Submitted, DeclarationStatus::UnderReview])
            .await?;
        declarations.sort_by(|a, b| a.created_at().cmp(&b.created_at()));
        if declarations.len() > limit {
            debug!(
                pending = declarations.len(),
                limit, "pending queue truncated"
            );
            declarations.truncate(limit);
        }
        Ok(declarations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gift_primitives::{Direction, GiftType, PrincipalId};
    use gift_store::DeclarationDraft;

    fn declaration(value: u64, status: DeclarationStatus) -> Declaration {
        let draft = DeclarationDraft::builder(Direction::Received, GiftType::Physical)
            .description("Bottle of wine")
            .unwrap()
            .estimated_value(value)
            .gift_date(NaiveDate::from_ymd_opt(2025, 6, 12).unwrap())
            .counterparty_name("J. Mwangi")
            .unwrap()
            .counterparty_org("Acme Supplies")
            .unwrap()
            .counterparty_relationship("Supplier")
            .unwrap()
            .justification("Year-end courtesy")
            .unwrap()
            .build()
            .unwrap();
        let declaration = Declaration::from_draft(PrincipalId::random(), draft);

        // Records always materialise as Submitted; rewrite the status through
        // the wire form to aggregate over the full lifecycle.
        let mut value = serde_json::to_value(&declaration).unwrap();
        value["status"] = serde_json::Value::from(status.as_str());
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn stats_partition_by_status() {
        let set = vec![
            declaration(1_000, DeclarationStatus::Submitted),
            declaration(2_000, DeclarationStatus::UnderReview),
            declaration(3_000, DeclarationStatus::Approved),
            declaration(4_000, DeclarationStatus::Rejected),
            declaration(5_000, DeclarationStatus::Escalated),
        ];

        let stats = compute_stats(&set);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.total_value, 15_000);
    }

    #[test]
    fn stats_on_empty_set_are_zero() {
        assert_eq!(compute_stats(&[]), DeclarationStats::default());
    }
}
