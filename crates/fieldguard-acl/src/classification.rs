//! Security-classification ceiling for a caller.
//!
//! A caller's ceiling is the highest classification among their registered
//! roles. An attribute inherits the classification of its nearest classified
//! ancestor; an attribute whose whole ancestry is unclassified is handled per
//! [`UnclassifiedPolicy`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use fieldguard_core::{
    AccessType, AttributePath, PermissionMap, PermissionSet, SecurityClassification,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lookup::AccessLookup;

/// Classification per attribute, as supplied with a resource.
pub type ClassificationMap = BTreeMap<AttributePath, SecurityClassification>;

/// What to do with an attribute that has no classification at or above it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnclassifiedPolicy {
    /// Treat it as unclassified and never visible.
    #[default]
    Hide,
    /// Fail the request with `UnresolvedRootClassification`.
    Reject,
}

/// Computes visibility ceilings and per-attribute classifications.
#[derive(Clone)]
pub struct SecurityClassificationResolver {
    lookup: Arc<dyn AccessLookup>,
    unclassified: UnclassifiedPolicy,
}

impl SecurityClassificationResolver {
    /// Creates a resolver backed by `lookup`.
    pub fn new(lookup: Arc<dyn AccessLookup>, unclassified: UnclassifiedPolicy) -> Self {
        Self {
            lookup,
            unclassified,
        }
    }

    /// Highest classification among `roles`.
    ///
    /// Only roles registered for EXPLICIT or ROLE_BASED access count.
    ///
    /// # Errors
    ///
    /// Returns `NoMatchingRoleClassification` when none of the roles is
    /// registered; lookup failures are returned unchanged.
    pub async fn max_classification_for_roles(
        &self,
        roles: &BTreeSet<String>,
    ) -> Result<SecurityClassification> {
        let registered = self
            .lookup
            .fetch_role_classifications(roles, &[AccessType::Explicit, AccessType::RoleBased])
            .await?;

        registered
            .iter()
            .map(|r| r.security_classification)
            .max()
            .ok_or_else(|| {
                fieldguard_core::Error::NoMatchingRoleClassification {
                    roles: roles.iter().cloned().collect(),
                }
                .into()
            })
    }

    /// Keeps the entries of `permissions` whose classification is in `visible`.
    ///
    /// Kept permission sets are returned unmodified, including non-READ bits.
    ///
    /// # Errors
    ///
    /// Under [`UnclassifiedPolicy::Reject`], fails on the first attribute with
    /// no classification at or above it.
    pub fn filter_permissions(
        &self,
        permissions: &PermissionMap,
        classifications: &ClassificationMap,
        visible: &BTreeSet<SecurityClassification>,
    ) -> Result<PermissionMap> {
        let mut kept = PermissionMap::new();
        for (path, perms) in permissions {
            let resolved = match self.unclassified {
                UnclassifiedPolicy::Hide => resolve_classification(path, classifications),
                UnclassifiedPolicy::Reject => {
                    Some(require_classification(path, classifications)?)
                }
            };
            match resolved {
                Some(classification) if visible.contains(&classification) => {
                    kept.insert(path.clone(), *perms);
                }
                _ => {
                    tracing::trace!(attribute = %path, ?resolved, "Attribute above ceiling");
                }
            }
        }
        Ok(kept)
    }
}

impl std::fmt::Debug for SecurityClassificationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityClassificationResolver")
            .field("unclassified", &self.unclassified)
            .finish_non_exhaustive()
    }
}

/// Classifications at or below `max`.
pub fn visible_classifications(max: SecurityClassification) -> BTreeSet<SecurityClassification> {
    SecurityClassification::visible_up_to(max)
}

/// Permissions to prune the document with once a ceiling has been applied.
///
/// Starts from `visible` and adds an empty (denying) entry for every granted
/// attribute the ceiling removed, and for every classified attribute above the
/// ceiling. Without these, a READ on a surviving ancestor would still expose
/// the hidden subtree.
pub fn ceiling_permissions(
    granted: &PermissionMap,
    visible: &PermissionMap,
    classifications: &ClassificationMap,
    allowed: &BTreeSet<SecurityClassification>,
) -> PermissionMap {
    let mut pruning = visible.clone();
    for path in granted.keys() {
        pruning.entry(path.clone()).or_insert_with(PermissionSet::empty);
    }
    for (path, classification) in classifications {
        if !allowed.contains(classification) {
            pruning.entry(path.clone()).or_insert_with(PermissionSet::empty);
        }
    }
    pruning
}

/// Classification of `path`: its own entry, else its nearest classified ancestor.
///
/// Returns `None` (unclassified) if neither the path nor any ancestor up to
/// the root has an entry.
pub fn resolve_classification(
    path: &AttributePath,
    classifications: &ClassificationMap,
) -> Option<SecurityClassification> {
    if let Some(found) = classifications.get(path) {
        return Some(*found);
    }
    path.ancestors()
        .find_map(|ancestor| classifications.get(&ancestor).copied())
}

/// Like [`resolve_classification`], but an unclassified path is an error.
///
/// # Errors
///
/// Returns `UnresolvedRootClassification` naming `path`.
pub fn require_classification(
    path: &AttributePath,
    classifications: &ClassificationMap,
) -> Result<SecurityClassification> {
    resolve_classification(path, classifications).ok_or_else(|| {
        fieldguard_core::Error::UnresolvedRootClassification {
            path: path.to_string(),
        }
        .into()
    })
}

// ============================================================================
// Tests
// ============================================================================
