//! Turns raw grant rows into one effective permission map.
//!
//! Explicit grants win outright: when any exist for the caller, role-based
//! defaults are not consulted at all.
//!
//! 1. Explicit rows are grouped by relationship (no relationship is its own
//!    group), each group becomes one map, and the groups are unioned.
//! 2. Otherwise the caller's roles are narrowed to those registered as
//!    ROLE_BASED; each role's default grants become one map, and the role maps
//!    are unioned. No such role means no access.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use fieldguard_core::{
    add_permissions, merge_permissions, AccessType, PermissionMap, ResourceDefinition,
};

use crate::error::Result;
use crate::lookup::AccessLookup;

/// Outcome of access resolution for one caller and resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedAccess {
    /// Effective permissions, or `None` when the caller has no access at all.
    pub permissions: Option<PermissionMap>,
    /// Which scheme produced the permissions.
    pub access_type: AccessType,
    /// Distinct relationships seen on explicit grants.
    pub relationships: BTreeSet<String>,
}

impl ResolvedAccess {
    /// Returns `true` if the caller has no access.
    pub fn is_denied(&self) -> bool {
        self.permissions.is_none()
    }
}

/// Resolves explicit and role-based grants into a [`ResolvedAccess`].
#[derive(Clone)]
pub struct AccessRecordResolver {
    lookup: Arc<dyn AccessLookup>,
}

impl AccessRecordResolver {
    /// Creates a resolver backed by `lookup`.
    pub fn new(lookup: Arc<dyn AccessLookup>) -> Self {
        Self { lookup }
    }

    /// Resolves the caller's effective permissions on a resource.
    ///
    /// # Errors
    ///
    /// Lookup failures are returned unchanged.
    pub async fn resolve(
        &self,
        accessor_id: &str,
        roles: &BTreeSet<String>,
        resource_id: &str,
        definition: &ResourceDefinition,
    ) -> Result<ResolvedAccess> {
        let records = self
            .lookup
            .fetch_explicit_access(accessor_id, roles, resource_id, &definition.resource_type)
            .await?;

        if !records.is_empty() {
            let mut groups: BTreeMap<Option<String>, PermissionMap> = BTreeMap::new();
            for record in records {
                let group = groups.entry(record.relationship).or_default();
                add_permissions(group, record.attribute, record.permissions);
            }

            let relationships: BTreeSet<String> = groups.keys().flatten().cloned().collect();
            let permissions = merge_permissions(groups.values());
            tracing::debug!(
                accessor = accessor_id,
                resource = resource_id,
                groups = groups.len(),
                attributes = permissions.len(),
                "Resolved explicit access"
            );

            return Ok(ResolvedAccess {
                permissions: Some(permissions),
                access_type: AccessType::Explicit,
                relationships,
            });
        }

        let role_based: BTreeSet<String> = self
            .lookup
            .fetch_role_classifications(roles, &[AccessType::RoleBased])
            .await?
            .into_iter()
            .map(|r| r.role_name)
            .collect();

        if role_based.is_empty() {
            tracing::debug!(
                accessor = accessor_id,
                resource = resource_id,
                "No explicit grants and no role-based roles"
            );
            return Ok(ResolvedAccess {
                permissions: None,
                access_type: AccessType::RoleBased,
                relationships: BTreeSet::new(),
            });
        }

        let mut role_maps = Vec::with_capacity(role_based.len());
        for role in &role_based {
            let mut map = PermissionMap::new();
            for grant in self.lookup.fetch_default_grants(definition, role).await? {
                add_permissions(&mut map, grant.attribute, grant.permissions);
            }
            role_maps.push(map);
        }

        let permissions = merge_permissions(&role_maps);
        tracing::debug!(
            accessor = accessor_id,
            resource = resource_id,
            roles = role_based.len(),
            attributes = permissions.len(),
            "Resolved role-based access"
        );

        Ok(ResolvedAccess {
            permissions: Some(permissions),
            access_type: AccessType::RoleBased,
            relationships: BTreeSet::new(),
        })
    }
}

impl std::fmt::Debug for AccessRecordResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessRecordResolver").finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
