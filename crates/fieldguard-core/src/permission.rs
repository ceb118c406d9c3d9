//! Permissions and their integer bitmask encoding.
//!
//! Grants are persisted as the sum of their member flags
//! (`CREATE=1, READ=2, UPDATE=4, DELETE=8`). [`PermissionSet::encode`] and
//! [`PermissionSet::decode`] convert between the two representations.
//!
//! # Example
//!
//! ```rust
//! use fieldguard_core::{Permission, PermissionSet};
//!
//! let set = PermissionSet::from_iter([Permission::Read, Permission::Update]);
//! assert_eq!(set.encode(), 6);
//! assert_eq!(PermissionSet::decode(6).unwrap(), set);
//! ```

use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// Permission
// ============================================================================

/// A single operation a caller may perform on an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    /// Create the attribute.
    Create,
    /// See the attribute.
    Read,
    /// Change the attribute.
    Update,
    /// Remove the attribute.
    Delete,
}

impl Permission {
    /// All known permissions in flag order.
    pub const ALL: [Permission; 4] = [
        Permission::Create,
        Permission::Read,
        Permission::Update,
        Permission::Delete,
    ];

    /// Bit value used in the persisted bitmask.
    pub const fn bit(self) -> u8 {
        match self {
            Self::Create => 1,
            Self::Read => 2,
            Self::Update => 4,
            Self::Delete => 8,
        }
    }

    /// Upper-case wire name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// PermissionSet
// ============================================================================

/// Sum of every known flag; the largest valid bitmask.
const ALL_BITS: u8 = 0b1111;

/// A subset of [`Permission`]s.
///
/// An empty set is a meaningful grant ("no permission"), distinct from the
/// attribute having no grant at all.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PermissionSet(u8);

impl PermissionSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// The set holding every permission.
    pub const fn all() -> Self {
        Self(ALL_BITS)
    }

    /// Encodes the set as the sum of its member bits.
    pub fn encode(self) -> i64 {
        i64::from(self.0)
    }

    /// Decodes a persisted bitmask.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPermissionValue`] if `value` is negative or
    /// exceeds the sum of all known flags.
    pub fn decode(value: i64) -> Result<Self> {
        if !(0..=i64::from(ALL_BITS)).contains(&value) {
            return Err(Error::UnsupportedPermissionValue { value });
        }
        let set = Permission::ALL
            .iter()
            .filter(|p| value & i64::from(p.bit()) != 0)
            .copied()
            .collect();
        Ok(set)
    }

    /// Returns `true` if `permission` is a member.
    pub fn contains(self, permission: Permission) -> bool {
        self.0 & permission.bit() != 0
    }

    /// Shorthand for `contains(Permission::Read)`.
    pub fn can_read(self) -> bool {
        self.contains(Permission::Read)
    }

    /// Adds a permission.
    pub fn insert(&mut self, permission: Permission) {
        self.0 |= permission.bit();
    }

    /// Removes a permission.
    pub fn remove(&mut self, permission: Permission) {
        self.0 &= !permission.bit();
    }

    /// Set union.
    #[must_use]
    pub fn union(self, other: PermissionSet) -> PermissionSet {
        Self(self.0 | other.0)
    }

    /// Returns `true` for the empty set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of members.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates members in flag order.
    pub fn iter(self) -> impl Iterator<Item = Permission> {
        Permission::ALL.into_iter().filter(move |p| self.contains(*p))
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        let mut set = PermissionSet::empty();
        for permission in iter {
            set.insert(permission);
        }
        set
    }
}

impl From<Permission> for PermissionSet {
    fn from(permission: Permission) -> Self {
        Self(permission.bit())
    }
}

impl fmt::Debug for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Permission::name).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for permission in self.iter() {
            seq.serialize_element(&permission)?;
        }
        seq.end()
    }
}

/// Accepted wire shapes: the persisted bitmask or a list of names.
#[derive(Deserialize)]
#[serde(untagged)]
enum PermissionSetRepr {
    Bitmask(i64),
    Names(Vec<Permission>),
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match PermissionSetRepr::deserialize(deserializer)? {
            PermissionSetRepr::Bitmask(value) => {
                PermissionSet::decode(value).map_err(de::Error::custom)
            }
            PermissionSetRepr::Names(names) => Ok(names.into_iter().collect()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
