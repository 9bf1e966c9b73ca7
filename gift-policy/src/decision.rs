//! Decision types returned by the policy engine.

use serde::{Deserialize, Serialize};

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    /// The action is permitted.
    Allow,
    /// The action is rejected. Absence of a matching rule is a deny, never
    /// an error.
    Deny,
}

/// Structured decision emitted by the policy engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDecision {
    kind: DecisionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    matched_rule: Option<String>,
}

impl PolicyDecision {
    /// Returns an allow decision attributed to the named rule.
    #[must_use]
    pub fn allow(rule: impl Into<String>) -> Self {
        Self {
            kind: DecisionKind::Allow,
            reason: None,
            matched_rule: Some(rule.into()),
        }
    }

    /// Returns a deny decision with an explanatory reason.
    ///
    /// The reason is intentionally generic on read paths so a denial does not
    /// reveal whether the resource exists.
    #[must_use]
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            kind: DecisionKind::Deny,
            reason: Some(reason.into()),
            matched_rule: None,
        }
    }

    /// Returns the decision kind.
    #[must_use]
    pub const fn kind(&self) -> DecisionKind {
        self.kind
    }

    /// Returns `true` when the decision allows the action to proceed.
    #[must_use]
    pub fn is_allow(&self) -> bool {
        self.kind == DecisionKind::Allow
    }

    /// Returns `true` when the decision denies the action.
    #[must_use]
    pub fn is_deny(&self) -> bool {
        self.kind == DecisionKind::Deny
    }

    /// Returns the optional reason associated with the decision.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Returns the name of the rule that granted access, when allowed.
    #[must_use]
    pub fn matched_rule(&self) -> Option<&str> {
        self.matched_rule.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_helpers_work() {
        let allow = PolicyDecision::allow("owner-declaration");
        assert!(allow.is_allow());
        assert_eq!(allow.matched_rule(), Some("owner-declaration"));
        assert_eq!(allow.reason(), None);

        let deny = PolicyDecision::deny("not permitted");
        assert!(deny.is_deny());
        assert_eq!(deny.reason(), Some("not permitted"));
        assert_eq!(deny.matched_rule(), None);
    }

    #[test]
    fn decisions_serialize_in_snake_case() {
        let allow = PolicyDecision::allow("owner-declaration");
        let json = serde_json::to_value(&allow).unwrap();
        assert_eq!(json["kind"], "allow");
        assert_eq!(json["matched_rule"], "owner-declaration");
        assert!(json.get("reason").is_none());

        let deny: PolicyDecision = serde_json::from_value(serde_json::json!({
            "kind": "deny",
            "reason": "not permitted",
        }))
        .unwrap();
        assert!(deny.is_deny());
        assert_eq!(deny.reason(), Some("not permitted"));
    }
}
