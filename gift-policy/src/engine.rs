//! Rule-table policy evaluation.

use gift_primitives::Role;
use thiserror::Error;
use tracing::debug;

use crate::contracts::{AccessRequest, PolicyAction, ResourceKind};
use crate::decision::PolicyDecision;

/// Errors surfaced while assembling policy rules.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Rule configuration error.
    #[error("invalid policy rule: {0}")]
    InvalidRule(&'static str),
}

/// Result alias for policy assembly.
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Matches the requesting principal's relationship to the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorMatcher {
    /// The principal owns the targeted resource (or, for reviews, owns the
    /// parent declaration). Grants are scoped to owned records only.
    Owner,
    /// The principal holds the given role. Grants apply to all records.
    Role(Role),
}

impl ActorMatcher {
    fn matches(self, request: &AccessRequest<'_>) -> bool {
        match self {
            Self::Owner => request.resource().owner() == request.principal().id(),
            Self::Role(role) => request.principal().holds(role),
        }
    }
}

/// Single row of the access grid: who may do what to which resource kind.
#[derive(Debug, Clone)]
pub struct PolicyRule {
    name: String,
    actor: ActorMatcher,
    resource: ResourceKind,
    actions: Vec<PolicyAction>,
}

impl PolicyRule {
    /// Creates a new rule granting the listed actions.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidRule`] when the rule name is empty or no
    /// actions are granted.
    pub fn new(
        name: impl Into<String>,
        actor: ActorMatcher,
        resource: ResourceKind,
        actions: impl Into<Vec<PolicyAction>>,
    ) -> PolicyResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PolicyError::InvalidRule("rule name cannot be empty"));
        }
        let actions = actions.into();
        if actions.is_empty() {
            return Err(PolicyError::InvalidRule(
                "rule must grant at least one action",
            ));
        }

        Ok(Self {
            name,
            actor,
            resource,
            actions,
        })
    }

    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, request: &AccessRequest<'_>) -> bool {
        self.resource == request.resource().kind()
            && self.actions.contains(&request.action())
            && self.actor.matches(request)
    }
}

/// Rule-table policy engine with union semantics.
///
/// A request is allowed when any rule matches; otherwise it is denied. Deny
/// is the default: absence of a matching rule is a hard deny, never an error.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    rules: Vec<PolicyRule>,
}

impl AccessPolicy {
    /// Creates an empty policy that denies everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the standard compliance access grid.
    ///
    /// | actor      | resource    | actions                    | scope |
    /// |------------|-------------|----------------------------|-------|
    /// | owner      | declaration | create read update delete  | own   |
    /// | compliance | declaration | read update                | all   |
    /// | admin      | declaration | read update delete         | all   |
    /// | compliance | review      | create read update         | all   |
    /// | admin      | review      | create read update delete  | all   |
    /// | owner      | review      | read                       | own   |
    #[must_use]
    pub fn standard() -> Self {
        use PolicyAction::{Create, Delete, Read, Update};

        let rules = [
            PolicyRule::new(
                "owner-declaration",
                ActorMatcher::Owner,
                ResourceKind::Declaration,
                vec![Create, Read, Update, Delete],
            ),
            PolicyRule::new(
                "compliance-declaration",
                ActorMatcher::Role(Role::Compliance),
                ResourceKind::Declaration,
                vec![Read, Update],
            ),
            PolicyRule::new(
                "admin-declaration",
                ActorMatcher::Role(Role::Admin),
                ResourceKind::Declaration,
                vec![Read, Update, Delete],
            ),
            PolicyRule::new(
                "compliance-review",
                ActorMatcher::Role(Role::Compliance),
                ResourceKind::Review,
                vec![Create, Read, Update],
            ),
            PolicyRule::new(
                "admin-review",
                ActorMatcher::Role(Role::Admin),
                ResourceKind::Review,
                vec![Create, Read, Update, Delete],
            ),
            PolicyRule::new(
                "owner-review-read",
                ActorMatcher::Owner,
                ResourceKind::Review,
                vec![Read],
            ),
        ];

        let mut policy = Self::new();
        for rule in rules {
            // Static table: names and action lists are known-good.
            policy.rules.push(rule.expect("standard rule"));
        }
        policy
    }

    /// Appends a rule and returns the updated policy.
    #[must_use]
    pub fn with_rule(mut self, rule: PolicyRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Evaluates the request against the rule table.
    #[must_use]
    pub fn evaluate(&self, request: &AccessRequest<'_>) -> PolicyDecision {
        for rule in &self.rules {
            if rule.matches(request) {
                debug!(
                    rule = rule.name(),
                    action = request.action().label(),
                    principal = %request.principal().id(),
                    "policy rule matched"
                );
                return PolicyDecision::allow(rule.name());
            }
        }

        PolicyDecision::deny("not permitted")
    }
}
