//! Status transition rules.

use gift_primitives::{DeclarationStatus, ReviewDecision};

use crate::{WorkflowError, WorkflowResult};

/// Resolves the status a review decision moves the declaration into.
///
/// Reviews are only accepted while the declaration is `Submitted` or
/// `UnderReview`; terminal records, drafts, and escalated holds reject the
/// decision outright.
///
/// # Errors
///
/// Returns [`WorkflowError::InvalidTransition`] when the current status does
/// not accept reviews.
pub fn review_transition(
    from: DeclarationStatus,
    decision: ReviewDecision,
) -> WorkflowResult<DeclarationStatus> {
    if !from.accepts_review() {
        return Err(WorkflowError::InvalidTransition {
            from,
            detail: format!("review decision {decision:?} is not accepted in this status"),
        });
    }
    Ok(decision.resulting_status())
}

/// Returns `true` when an administrative override may move `from` to `to`.
///
/// Overrides walk the lifecycle graph, escalation included, and are the one
/// sanctioned way out of `Approved`/`Rejected` — but a terminal record
/// reopens into review (`UnderReview` or `Escalated`), never straight into
/// the opposite decision. `Draft` is never a valid target; its one exit is
/// submission. Every override is written to the audit trail.
#[must_use]
pub fn override_allowed(from: DeclarationStatus, to: DeclarationStatus) -> bool {
    use DeclarationStatus::{Approved, Draft, Escalated, Rejected, Submitted, UnderReview};

    match from {
        Draft => matches!(to, Submitted),
        Submitted => matches!(to, UnderReview | Approved | Rejected | Escalated),
        UnderReview => matches!(to, Approved | Rejected | Escalated),
        Escalated => matches!(to, UnderReview | Approved | Rejected),
        Approved | Rejected => matches!(to, UnderReview | Escalated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DeclarationStatus::{Approved, Draft, Escalated, Rejected, Submitted, UnderReview};

    #[test]
    fn review_moves_along_decision_mapping() {
        assert_eq!(
            review_transition(Submitted, ReviewDecision::Approved).unwrap(),
            Approved
        );
        assert_eq!(
            review_transition(Submitted, ReviewDecision::RequestInfo).unwrap(),
            UnderReview
        );
        assert_eq!(
            review_transition(UnderReview, ReviewDecision::Rejected).unwrap(),
            Rejected
        );
    }

    #[test]
    fn terminal_statuses_reject_reviews() {
        for from in [Approved, Rejected] {
            let err = review_transition(from, ReviewDecision::Rejected).expect_err("terminal");
            assert!(matches!(err, WorkflowError::InvalidTransition { .. }));
        }
    }

    #[test]
    fn draft_and_escalated_reject_reviews() {
        for from in [Draft, Escalated] {
            assert!(review_transition(from, ReviewDecision::Approved).is_err());
        }
    }

    #[test]
    fn nothing_transitions_into_draft() {
        for from in [Submitted, UnderReview, Approved, Rejected, Escalated] {
            assert!(!override_allowed(from, Draft));
        }
    }

    #[test]
    fn overrides_may_leave_terminal_states() {
        assert!(override_allowed(Approved, UnderReview));
        assert!(override_allowed(Rejected, Escalated));
        assert!(override_allowed(Escalated, Approved));
        assert!(!override_allowed(Approved, Approved));
    }

    #[test]
    fn overrides_walk_the_lifecycle_graph_only() {
        // A terminal decision reopens into review; it never flips directly.
        assert!(!override_allowed(Approved, Rejected));
        assert!(!override_allowed(Rejected, Approved));

        // Nothing returns to the submission queue.
        assert!(!override_allowed(Approved, Submitted));
        assert!(!override_allowed(Escalated, Submitted));
        assert!(!override_allowed(UnderReview, Submitted));

        // A migrated draft's one exit is submission.
        assert!(override_allowed(Draft, Submitted));
        assert!(!override_allowed(Draft, Approved));
        assert!(!override_allowed(Draft, Escalated));
    }
}
