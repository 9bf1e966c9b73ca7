//! Status and classification enums shared across the compliance core.

use serde::{Deserialize, Serialize};

/// Whether the gift was received by or issued from the declaring employee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// The employee received the gift.
    Received,
    /// The employee gave the gift.
    Issued,
}

/// Broad classification of the gift.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GiftType {
    /// Cash or a cash equivalent. Flaggable by compliance policy, never
    /// blocked here.
    Cash,
    /// A physical item.
    Physical,
    /// Services, hospitality, or other non-physical benefit.
    InKind,
}

/// Lifecycle status of a declaration.
///
/// `Draft` is representable but the creation path always submits directly;
/// `Escalated` is an administrative hold reachable only through a status
/// override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeclarationStatus {
    /// Captured but not yet submitted for review.
    Draft,
    /// Submitted and awaiting a first compliance decision.
    Submitted,
    /// A reviewer has requested more information; the review continues.
    UnderReview,
    /// Terminal: the gift was approved.
    Approved,
    /// Terminal: the gift was rejected.
    Rejected,
    /// Exceptional non-terminal hold requiring administrative resolution.
    Escalated,
}

impl DeclarationStatus {
    /// Returns `true` for statuses from which no normal transition proceeds.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Returns `true` when a review decision may be recorded in this status.
    #[must_use]
    pub const fn accepts_review(self) -> bool {
        matches!(self, Self::Submitted | Self::UnderReview)
    }

    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::UnderReview => "UNDER_REVIEW",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Escalated => "ESCALATED",
        }
    }
}

/// Decision recorded by a compliance review.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecision {
    /// Approve the declaration.
    Approved,
    /// Reject the declaration.
    Rejected,
    /// Ask the owner for more information; the declaration stays in review.
    RequestInfo,
}

impl ReviewDecision {
    /// Returns the declaration status this decision moves the record into.
    #[must_use]
    pub const fn resulting_status(self) -> DeclarationStatus {
        match self {
            Self::Approved => DeclarationStatus::Approved,
            Self::Rejected => DeclarationStatus::Rejected,
            Self::RequestInfo => DeclarationStatus::UnderReview,
        }
    }

    /// Returns the wire name of the decision.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::RequestInfo => "REQUEST_INFO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(DeclarationStatus::Approved.is_terminal());
        assert!(DeclarationStatus::Rejected.is_terminal());
        assert!(!DeclarationStatus::Escalated.is_terminal());
        assert!(!DeclarationStatus::Submitted.is_terminal());
    }

    #[test]
    fn review_window() {
        assert!(DeclarationStatus::Submitted.accepts_review());
        assert!(DeclarationStatus::UnderReview.accepts_review());
        assert!(!DeclarationStatus::Draft.accepts_review());
        assert!(!DeclarationStatus::Escalated.accepts_review());
        assert!(!DeclarationStatus::Approved.accepts_review());
    }

    #[test]
    fn decision_mapping() {
        assert_eq!(
            ReviewDecision::Approved.resulting_status(),
            DeclarationStatus::Approved
        );
        assert_eq!(
            ReviewDecision::Rejected.resulting_status(),
            DeclarationStatus::Rejected
        );
        assert_eq!(
            ReviewDecision::RequestInfo.resulting_status(),
            DeclarationStatus::UnderReview
        );
    }

    #[test]
    fn status_wire_names_are_screaming() {
        let json = serde_json::to_string(&DeclarationStatus::UnderReview).unwrap();
        assert_eq!(json, "\"UNDER_REVIEW\"");
        let json = serde_json::to_string(&GiftType::InKind).unwrap();
        assert_eq!(json, "\"IN_KIND\"");
    }
}
