//! Security classifications and access-type tags.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// SecurityClassification
// ============================================================================

/// Ordered sensitivity label attached to attributes and roles.
///
/// The derived ordering follows the hierarchy: `Public < Private < Restricted`.
/// "Unclassified" is not a variant; it is modelled as `Option::None` wherever
/// a classification may be missing, and is never visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityClassification {
    /// Visible to any classified role.
    Public,
    /// Needs at least a PRIVATE role.
    Private,
    /// Needs a RESTRICTED role.
    Restricted,
}

impl SecurityClassification {
    /// All classifications, lowest first.
    pub const ALL: [SecurityClassification; 3] = [
        SecurityClassification::Public,
        SecurityClassification::Private,
        SecurityClassification::Restricted,
    ];

    /// Numeric hierarchy level (PUBLIC = 0).
    pub const fn hierarchy(self) -> u8 {
        match self {
            Self::Public => 0,
            Self::Private => 1,
            Self::Restricted => 2,
        }
    }

    /// Inverse of [`hierarchy`](Self::hierarchy).
    pub fn from_hierarchy(level: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.hierarchy() == level)
    }

    /// Every classification at or below `max`.
    pub fn visible_up_to(max: SecurityClassification) -> BTreeSet<SecurityClassification> {
        Self::ALL.into_iter().filter(|c| *c <= max).collect()
    }
}

impl fmt::Display for SecurityClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Public => "PUBLIC",
            Self::Private => "PRIVATE",
            Self::Restricted => "RESTRICTED",
        };
        f.write_str(name)
    }
}

// ============================================================================
// AccessType
// ============================================================================

/// How a caller's effective permissions were derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessType {
    /// Accessor-specific grants exist for the resource.
    Explicit,
    /// Derived from the caller's roles' default grants.
    RoleBased,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit => f.write_str("EXPLICIT"),
            Self::RoleBased => f.write_str("ROLE_BASED"),
        }
    }
}

// ============================================================================
// RoleClassification
// ============================================================================

/// Registered classification of a role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleClassification {
    /// Role name.
    pub role_name: String,
    /// Highest classification the role may see.
    pub security_classification: SecurityClassification,
    /// Access scheme the role participates in.
    pub access_type: AccessType,
}
