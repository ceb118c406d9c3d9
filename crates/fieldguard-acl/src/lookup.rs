//! Grant and classification lookups.
//!
//! The engine does not own persistence. It asks an [`AccessLookup`] for the
//! rows relevant to one request and computes on the returned lists. Retrying,
//! caching and connection handling belong to the implementation.
//!
//! [`MemoryLookup`] answers from an in-memory [`GrantFixture`], which is what
//! the CLI and the test suites use.

use std::collections::BTreeSet;

use async_trait::async_trait;
use fieldguard_core::{
    AccessGrantRecord, AccessType, AccessorType, DefaultRoleGrant, ResourceDefinition,
    RoleClassification,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Source of grant records and role classifications.
///
/// # Async
///
/// Methods are async so database-backed implementations can perform I/O
/// without blocking. The engine awaits each call once per request.
#[async_trait]
pub trait AccessLookup: Send + Sync {
    /// Explicit grants on `resource_id` for the caller.
    ///
    /// Must return rows whose accessor is the user `accessor_id`, one of
    /// `roles` (as a ROLE accessor), or the DEFAULT accessor.
    async fn fetch_explicit_access(
        &self,
        accessor_id: &str,
        roles: &BTreeSet<String>,
        resource_id: &str,
        resource_type: &str,
    ) -> Result<Vec<AccessGrantRecord>>;

    /// Registered classifications for `role_names` limited to `access_types`.
    async fn fetch_role_classifications(
        &self,
        role_names: &BTreeSet<String>,
        access_types: &[AccessType],
    ) -> Result<Vec<RoleClassification>>;

    /// Default grants of `role_name` for a resource definition.
    async fn fetch_default_grants(
        &self,
        definition: &ResourceDefinition,
        role_name: &str,
    ) -> Result<Vec<DefaultRoleGrant>>;
}

/// Serializable bundle of every row a [`MemoryLookup`] can serve.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantFixture {
    /// Explicit access rows.
    #[serde(default)]
    pub explicit_access: Vec<AccessGrantRecord>,
    /// Role-based default rows.
    #[serde(default)]
    pub default_grants: Vec<DefaultRoleGrant>,
    /// Role classification registry.
    #[serde(default)]
    pub role_classifications: Vec<RoleClassification>,
}

/// In-memory [`AccessLookup`].
#[derive(Clone, Debug, Default)]
pub struct MemoryLookup {
    fixture: GrantFixture,
}

impl MemoryLookup {
    /// Creates an empty lookup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves rows from `fixture`.
    pub fn from_fixture(fixture: GrantFixture) -> Self {
        Self { fixture }
    }

    /// Parses a JSON fixture.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if the JSON does not describe a [`GrantFixture`].
    pub fn from_json(json: &str) -> Result<Self> {
        let fixture = serde_json::from_str(json)
            .map_err(|e| crate::Error::lookup_with_source("invalid grant fixture", e))?;
        Ok(Self::from_fixture(fixture))
    }

    /// Adds an explicit access row.
    #[must_use]
    pub fn with_explicit(mut self, record: AccessGrantRecord) -> Self {
        self.fixture.explicit_access.push(record);
        self
    }

    /// Adds a role-based default row.
    #[must_use]
    pub fn with_default_grant(mut self, grant: DefaultRoleGrant) -> Self {
        self.fixture.default_grants.push(grant);
        self
    }

    /// Registers a role classification.
    #[must_use]
    pub fn with_role(mut self, role: RoleClassification) -> Self {
        self.fixture.role_classifications.push(role);
        self
    }

    /// The rows being served.
    pub fn fixture(&self) -> &GrantFixture {
        &self.fixture
    }
}

fn accessor_matches(record: &AccessGrantRecord, accessor_id: &str, roles: &BTreeSet<String>) -> bool {
    match record.accessor_type {
        AccessorType::User => record.accessor_id == accessor_id,
        AccessorType::Role => roles.contains(&record.accessor_id),
        AccessorType::Default => true,
    }
}

#[async_trait]
impl AccessLookup for MemoryLookup {
    async fn fetch_explicit_access(
        &self,
        accessor_id: &str,
        roles: &BTreeSet<String>,
        resource_id: &str,
        resource_type: &str,
    ) -> Result<Vec<AccessGrantRecord>> {
        Ok(self
            .fixture
            .explicit_access
            .iter()
            .filter(|r| r.resource_id == resource_id)
            .filter(|r| r.resource_definition.resource_type == resource_type)
            .filter(|r| accessor_matches(r, accessor_id, roles))
            .cloned()
            .collect())
    }

    async fn fetch_role_classifications(
        &self,
        role_names: &BTreeSet<String>,
        access_types: &[AccessType],
    ) -> Result<Vec<RoleClassification>> {
        Ok(self
            .fixture
            .role_classifications
            .iter()
            .filter(|r| role_names.contains(&r.role_name))
            .filter(|r| access_types.contains(&r.access_type))
            .cloned()
            .collect())
    }

    async fn fetch_default_grants(
        &self,
        definition: &ResourceDefinition,
        role_name: &str,
    ) -> Result<Vec<DefaultRoleGrant>> {
        Ok(self
            .fixture
            .default_grants
            .iter()
            .filter(|g| &g.resource_definition == definition && g.role_name == role_name)
            .cloned()
            .collect())
    }
}
