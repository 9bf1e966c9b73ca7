//! Request contracts consumed by the policy engine.

use gift_primitives::{Principal, PrincipalId};
use serde::{Deserialize, Serialize};

/// Operation a principal is attempting against a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyAction {
    /// Create a new resource.
    Create,
    /// Read an existing resource.
    Read,
    /// Mutate an existing resource.
    Update,
    /// Permanently remove a resource.
    Delete,
}

impl PolicyAction {
    /// Returns a concise, human-readable label for the action.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// The kind of resource being targeted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A gift declaration.
    Declaration,
    /// A compliance review attached to a declaration.
    Review,
}

/// Ownership facts about the targeted resource.
///
/// For `create` there is no stored record yet; callers describe the record
/// that would exist (a declaration about to be created is owned by its
/// creator, a review belongs to the declaration under review).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceRef {
    /// A declaration owned by the given principal.
    Declaration {
        /// Identity of the declaration's owner.
        owner: PrincipalId,
    },
    /// A review whose parent declaration is owned by the given principal.
    Review {
        /// Identity of the parent declaration's owner.
        declaration_owner: PrincipalId,
    },
}

impl ResourceRef {
    /// Returns the resource kind.
    #[must_use]
    pub const fn kind(self) -> ResourceKind {
        match self {
            Self::Declaration { .. } => ResourceKind::Declaration,
            Self::Review { .. } => ResourceKind::Review,
        }
    }

    /// Returns the owning principal the resource is scoped to.
    #[must_use]
    pub const fn owner(self) -> PrincipalId {
        match self {
            Self::Declaration { owner } => owner,
            Self::Review { declaration_owner } => declaration_owner,
        }
    }
}

/// Full request evaluated by the policy engine.
#[derive(Clone, Debug)]
pub struct AccessRequest<'a> {
    principal: &'a Principal,
    action: PolicyAction,
    resource: ResourceRef,
}

impl<'a> AccessRequest<'a> {
    /// Creates a request for the given principal, action, and resource.
    #[must_use]
    pub const fn new(principal: &'a Principal, action: PolicyAction, resource: ResourceRef) -> Self {
        Self {
            principal,
            action,
            resource,
        }
    }

    /// Returns the requesting principal.
    #[must_use]
    pub const fn principal(&self) -> &'a Principal {
        self.principal
    }

    /// Returns the attempted action.
    #[must_use]
    pub const fn action(&self) -> PolicyAction {
        self.action
    }

    /// Returns the targeted resource.
    #[must_use]
    pub const fn resource(&self) -> ResourceRef {
        self.resource
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_ref_exposes_owner_and_kind() {
        let owner = PrincipalId::random();
        let declaration = ResourceRef::Declaration { owner };
        assert_eq!(declaration.kind(), ResourceKind::Declaration);
        assert_eq!(declaration.owner(), owner);

        let review = ResourceRef::Review {
            declaration_owner: owner,
        };
        assert_eq!(review.kind(), ResourceKind::Review);
        assert_eq!(review.owner(), owner);
    }

    #[test]
    fn action_labels() {
        assert_eq!(PolicyAction::Create.label(), "create");
        assert_eq!(PolicyAction::Delete.label(), "delete");
    }

    #[test]
    fn resource_refs_tag_their_kind_on_the_wire() {
        let owner = PrincipalId::random();

        let json = serde_json::to_value(ResourceRef::Declaration { owner }).unwrap();
        assert_eq!(json["kind"], "declaration");
        assert_eq!(json["owner"], owner.to_string());

        let json = serde_json::to_value(ResourceRef::Review {
            declaration_owner: owner,
        })
        .unwrap();
        assert_eq!(json["kind"], "review");
        assert_eq!(json["declaration_owner"], owner.to_string());

        assert_eq!(
            serde_json::to_value(PolicyAction::Update).unwrap(),
            "update"
        );
    }
}
