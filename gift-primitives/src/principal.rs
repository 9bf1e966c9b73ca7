//! Principal identity and role model.

use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, PrincipalId};

/// Named permission group a principal may belong to.
///
/// A principal with no role at all is a plain employee: an owner of its own
/// declarations and nothing more.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Role {
    /// Members of the compliance team; may review any declaration.
    Compliance,
    /// Administrators; compliance rights plus destructive overrides.
    Admin,
}

impl Role {
    /// Returns the canonical group name for the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compliance => "Compliance",
            Self::Admin => "Admin",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Compliance" => Ok(Self::Compliance),
            "Admin" => Ok(Self::Admin),
            other => Err(Error::UnknownRole {
                value: other.to_owned(),
            }),
        }
    }
}

/// Authenticated actor with zero or more roles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: PrincipalId,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    roles: BTreeSet<Role>,
}

impl Principal {
    /// Creates a principal with no roles (a plain employee).
    #[must_use]
    pub fn new(id: PrincipalId) -> Self {
        Self {
            id,
            roles: BTreeSet::new(),
        }
    }

    /// Adds a role and returns the updated principal.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    /// Extends the principal with multiple roles.
    #[must_use]
    pub fn with_roles<I>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        self.roles.extend(roles);
        self
    }

    /// Returns the principal identifier.
    #[must_use]
    pub const fn id(&self) -> PrincipalId {
        self.id
    }

    /// Returns the roles held by the principal.
    #[must_use]
    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    /// Returns `true` when the principal holds the given role.
    #[must_use]
    pub fn holds(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
