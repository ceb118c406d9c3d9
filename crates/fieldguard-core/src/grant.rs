//! Grant records as materialized by the persistence collaborator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::AttributePath;
use crate::permission::PermissionSet;

/// Kind of principal an explicit grant is issued to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessorType {
    /// A single user, matched on the caller's id.
    User,
    /// A role, matched against the caller's roles.
    Role,
    /// Applies to every caller.
    Default,
}

/// Identifies the kind of resource a grant applies to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDefinition {
    /// Owning service.
    pub service_name: String,
    /// Resource type within the service.
    pub resource_type: String,
    /// Resource name within the type.
    pub resource_name: String,
}

impl ResourceDefinition {
    /// Creates a definition from its three parts.
    pub fn new(
        service_name: impl Into<String>,
        resource_type: impl Into<String>,
        resource_name: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            resource_type: resource_type.into(),
            resource_name: resource_name.into(),
        }
    }
}

impl fmt::Display for ResourceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.service_name, self.resource_type, self.resource_name
        )
    }
}

/// One row of explicit access to a specific resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrantRecord {
    /// Resource the grant is scoped to.
    pub resource_id: String,
    /// User id or role name, depending on `accessor_type`.
    pub accessor_id: String,
    /// Kind of principal.
    pub accessor_type: AccessorType,
    /// Kind of resource.
    pub resource_definition: ResourceDefinition,
    /// Attribute the grant covers.
    #[serde(rename = "attributePath", alias = "attribute")]
    pub attribute: AttributePath,
    /// Granted operations.
    pub permissions: PermissionSet,
    /// Optional qualifier (e.g. "caseworker").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
}

/// One row of role-based default access.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultRoleGrant {
    /// Kind of resource.
    pub resource_definition: ResourceDefinition,
    /// Attribute the grant covers.
    #[serde(rename = "attributePath", alias = "attribute")]
    pub attribute: AttributePath,
    /// Role receiving the grant.
    pub role_name: String,
    /// Granted operations.
    pub permissions: PermissionSet,
}
