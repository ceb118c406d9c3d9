//! "Filter this resource for this caller."
//!
//! [`FilteringOrchestrator::filter_resource`] resolves the caller's effective
//! permissions, applies the classification ceiling when the resource carries
//! classifications, prunes the document, and assembles the result envelope.
//! Attributes above the ceiling are missing from both the report and the data.
//! One audit event is recorded per call.

use std::collections::BTreeSet;
use std::sync::Arc;

use fieldguard_core::{AccessType, PermissionMap, ResourceDefinition, SecurityClassification};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::audit::{AuditEntry, AuditOutcome, Auditor};
use crate::classification::{
    ceiling_permissions, visible_classifications, ClassificationMap,
    SecurityClassificationResolver,
};
use crate::config::AclConfig;
use crate::error::Result;
use crate::filter::filter_document;
use crate::lookup::AccessLookup;
use crate::resolver::AccessRecordResolver;

// ============================================================================
// Request / result types
// ============================================================================

/// A resource as held by the caller's service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Resource id.
    pub id: String,
    /// Kind of resource.
    pub definition: ResourceDefinition,
    /// Full, unfiltered document.
    pub data: Value,
}

/// Input to [`FilteringOrchestrator::filter_resource`].
#[derive(Clone, Debug, PartialEq)]
pub struct FilterRequest {
    /// Caller id.
    pub user_id: String,
    /// Caller roles, already authenticated.
    pub user_roles: BTreeSet<String>,
    /// Resource to filter.
    pub resource: Resource,
    /// Per-attribute classifications; `None` disables the ceiling.
    pub classifications: Option<ClassificationMap>,
}

impl FilterRequest {
    /// Creates a request without classifications.
    pub fn new<I, S>(user_id: impl Into<String>, roles: I, resource: Resource) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user_id: user_id.into(),
            user_roles: roles.into_iter().map(Into::into).collect(),
            resource,
            classifications: None,
        }
    }

    /// Attaches attribute classifications.
    #[must_use]
    pub fn with_classifications(mut self, classifications: ClassificationMap) -> Self {
        self.classifications = Some(classifications);
        self
    }
}

/// The resource as the caller may see it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredResource {
    /// Resource id.
    pub id: String,
    /// Kind of resource.
    pub definition: ResourceDefinition,
    /// Pruned document; `None` when nothing is readable.
    pub data: Option<Value>,
}

/// Permissions the caller may see, and how they were derived.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessReport {
    /// Visible attributes and their permission sets.
    pub permissions: PermissionMap,
    /// Which grant scheme applied.
    pub access_type: AccessType,
}

/// Result envelope returned to the REST layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredResult {
    /// Filtered resource.
    pub resource: FilteredResource,
    /// Caller's classification ceiling, when classifications were applied.
    pub user_security_classification: Option<SecurityClassification>,
    /// Visibility report.
    pub access: AccessReport,
    /// Relationships on the caller's explicit grants.
    pub relationships: BTreeSet<String>,
}

// ============================================================================
// FilteringOrchestrator
// ============================================================================

/// Composes access resolution, classification, and document filtering.
///
/// Holds no per-request state; share one instance across tasks.
#[derive(Clone, Debug)]
pub struct FilteringOrchestrator {
    resolver: AccessRecordResolver,
    classifier: SecurityClassificationResolver,
    auditor: Auditor,
}

impl FilteringOrchestrator {
    /// Creates an orchestrator over `lookup` with `config`.
    pub fn new(lookup: Arc<dyn AccessLookup>, config: AclConfig) -> Self {
        Self {
            resolver: AccessRecordResolver::new(lookup.clone()),
            classifier: SecurityClassificationResolver::new(
                lookup,
                config.classification.unclassified,
            ),
            auditor: Auditor::new(config.audit),
        }
    }

    /// Filters `request.resource` for the calling user.
    ///
    /// Returns `Ok(None)` when the caller has no access to the resource.
    ///
    /// # Errors
    ///
    /// Lookup failures, `NoMatchingRoleClassification` when classifications
    /// are supplied but none of the caller's roles is classified, and
    /// `UnresolvedRootClassification` under the reject policy.
    pub async fn filter_resource(&self, request: &FilterRequest) -> Result<Option<FilteredResult>> {
        let result = self.filter_unaudited(request).await;
        self.audit(request, &result);
        result
    }

    async fn filter_unaudited(&self, request: &FilterRequest) -> Result<Option<FilteredResult>> {
        let resource = &request.resource;
        let resolved = self
            .resolver
            .resolve(
                &request.user_id,
                &request.user_roles,
                &resource.id,
                &resource.definition,
            )
            .await?;

        let Some(permissions) = resolved.permissions else {
            tracing::debug!(user = %request.user_id, resource = %resource.id, "No access");
            return Ok(None);
        };

        let (visible, data, ceiling) = match &request.classifications {
            None => {
                let data = filter_document(&resource.data, &permissions);
                (permissions, data, None)
            }
            Some(classifications) => {
                let max = self
                    .classifier
                    .max_classification_for_roles(&request.user_roles)
                    .await?;
                let allowed = visible_classifications(max);
                let visible =
                    self.classifier
                        .filter_permissions(&permissions, classifications, &allowed)?;
                tracing::debug!(
                    user = %request.user_id,
                    ceiling = %max,
                    before = permissions.len(),
                    after = visible.len(),
                    "Applied classification ceiling"
                );
                let pruning =
                    ceiling_permissions(&permissions, &visible, classifications, &allowed);
                let data = filter_document(&resource.data, &pruning);
                (visible, data, Some(max))
            }
        };

        Ok(Some(FilteredResult {
            resource: FilteredResource {
                id: resource.id.clone(),
                definition: resource.definition.clone(),
                data,
            },
            user_security_classification: ceiling,
            access: AccessReport {
                permissions: visible,
                access_type: resolved.access_type,
            },
            relationships: resolved.relationships,
        }))
    }

    fn audit(&self, request: &FilterRequest, result: &Result<Option<FilteredResult>>) {
        if !self.auditor.is_enabled() {
            return;
        }
        let resource = &request.resource;
        let mut entry = AuditEntry {
            user_id: &request.user_id,
            roles: request.user_roles.iter().map(String::as_str).collect(),
            resource_id: &resource.id,
            service_name: &resource.definition.service_name,
            resource_type: &resource.definition.resource_type,
            access_type: None,
            relationships: Vec::new(),
            visible_attributes: 0,
            classification: None,
            outcome: AuditOutcome::Denied,
        };

        match result {
            Ok(Some(filtered)) => {
                entry.access_type = Some(filtered.access.access_type);
                entry.relationships = filtered.relationships.iter().map(String::as_str).collect();
                entry.visible_attributes = filtered.access.permissions.len();
                entry.classification = filtered.user_security_classification;
                entry.outcome = AuditOutcome::Granted;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(user = %request.user_id, resource = %resource.id, "Filtering failed: {e}");
                entry.outcome = AuditOutcome::Failed;
            }
        }

        self.auditor.record(&entry);
    }
}

// ============================================================================
// Tests
// ============================================================================
