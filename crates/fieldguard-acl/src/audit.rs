//! Audit events for filtering requests.
//!
//! The orchestrator hands an [`AuditEntry`] to its [`Auditor`] once per
//! request. What gets written is driven by [`AuditConfig`]: a message
//! template with `{field}` placeholders, plus the list of fields attached as
//! structured detail. Field values come from named accessors on the entry.

use std::fmt;
use std::str::FromStr;

use fieldguard_core::{AccessType, SecurityClassification};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Tracing target for audit events.
pub const AUDIT_TARGET: &str = "fieldguard::audit";

/// Default message template.
pub const DEFAULT_TEMPLATE: &str =
    "{user_id} requested {resource_type} {resource_id}: {outcome}";

// ============================================================================
// AuditField
// ============================================================================

/// A value an audit event can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditField {
    /// Caller id.
    UserId,
    /// Caller roles, comma separated.
    Roles,
    /// Resource id.
    ResourceId,
    /// Owning service of the resource.
    ServiceName,
    /// Resource type.
    ResourceType,
    /// EXPLICIT or ROLE_BASED, when resolved.
    AccessType,
    /// Relationships on explicit grants, comma separated.
    Relationships,
    /// Number of attributes in the visibility report.
    VisibleAttributes,
    /// Caller's classification ceiling, when computed.
    Classification,
    /// granted, denied, or failed.
    Outcome,
}

impl AuditField {
    /// Every field, in declaration order.
    pub const ALL: [AuditField; 10] = [
        AuditField::UserId,
        AuditField::Roles,
        AuditField::ResourceId,
        AuditField::ServiceName,
        AuditField::ResourceType,
        AuditField::AccessType,
        AuditField::Relationships,
        AuditField::VisibleAttributes,
        AuditField::Classification,
        AuditField::Outcome,
    ];

    /// Placeholder / detail key.
    pub fn key(self) -> &'static str {
        match self {
            Self::UserId => "user_id",
            Self::Roles => "roles",
            Self::ResourceId => "resource_id",
            Self::ServiceName => "service_name",
            Self::ResourceType => "resource_type",
            Self::AccessType => "access_type",
            Self::Relationships => "relationships",
            Self::VisibleAttributes => "visible_attributes",
            Self::Classification => "classification",
            Self::Outcome => "outcome",
        }
    }
}

impl fmt::Display for AuditField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AuditField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| Error::config(format!("unknown audit field '{s}'")))
    }
}

// ============================================================================
// AuditConfig
// ============================================================================

/// Audit settings, supplied when the orchestrator is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Whether audit events are emitted at all.
    pub enabled: bool,
    /// Message template; `{key}` is replaced by the matching field's value.
    pub template: String,
    /// Fields attached to the event as structured detail.
    pub fields: Vec<AuditField>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            template: DEFAULT_TEMPLATE.to_string(),
            fields: vec![
                AuditField::AccessType,
                AuditField::Relationships,
                AuditField::VisibleAttributes,
            ],
        }
    }
}

// ============================================================================
// AuditEntry
// ============================================================================

/// How a request ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuditOutcome {
    /// A filtered resource was returned.
    Granted,
    /// The caller has no access.
    Denied,
    /// The request failed with an error.
    Failed,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Granted => f.write_str("granted"),
            Self::Denied => f.write_str("denied"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Facts about one request, exposed to templates by name.
#[derive(Clone, Debug)]
pub struct AuditEntry<'a> {
    /// Caller id.
    pub user_id: &'a str,
    /// Caller roles.
    pub roles: Vec<&'a str>,
    /// Resource id.
    pub resource_id: &'a str,
    /// Owning service.
    pub service_name: &'a str,
    /// Resource type.
    pub resource_type: &'a str,
    /// Resolved access scheme, if resolution completed.
    pub access_type: Option<AccessType>,
    /// Relationships on explicit grants.
    pub relationships: Vec<&'a str>,
    /// Attributes in the visibility report.
    pub visible_attributes: usize,
    /// Classification ceiling, if computed.
    pub classification: Option<SecurityClassification>,
    /// How the request ended.
    pub outcome: AuditOutcome,
}

impl AuditEntry<'_> {
    /// String value of `field`.
    pub fn value(&self, field: AuditField) -> String {
        match field {
            AuditField::UserId => self.user_id.to_string(),
            AuditField::Roles => self.roles.join(","),
            AuditField::ResourceId => self.resource_id.to_string(),
            AuditField::ServiceName => self.service_name.to_string(),
            AuditField::ResourceType => self.resource_type.to_string(),
            AuditField::AccessType => self
                .access_type
                .map(|a| a.to_string())
                .unwrap_or_default(),
            AuditField::Relationships => self.relationships.join(","),
            AuditField::VisibleAttributes => self.visible_attributes.to_string(),
            AuditField::Classification => self
                .classification
                .map(|c| c.to_string())
                .unwrap_or_default(),
            AuditField::Outcome => self.outcome.to_string(),
        }
    }
}

// ============================================================================
// Auditor
// ============================================================================

/// Emits audit events according to an [`AuditConfig`].
#[derive(Clone, Debug, Default)]
pub struct Auditor {
    config: AuditConfig,
}

impl Auditor {
    /// Creates an auditor.
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    /// Whether events are emitted.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Renders the configured template for `entry`.
    pub fn render(&self, entry: &AuditEntry<'_>) -> String {
        AuditField::ALL
            .into_iter()
            .fold(self.config.template.clone(), |message, field| {
                let placeholder = format!("{{{}}}", field.key());
                if message.contains(&placeholder) {
                    message.replace(&placeholder, &entry.value(field))
                } else {
                    message
                }
            })
    }

    /// Renders the configured detail fields as `key=value` pairs.
    pub fn details(&self, entry: &AuditEntry<'_>) -> String {
        self.config
            .fields
            .iter()
            .map(|field| format!("{}={}", field.key(), entry.value(*field)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Emits one audit event, unless disabled.
    pub fn record(&self, entry: &AuditEntry<'_>) {
        if !self.config.enabled {
            return;
        }
        let message = self.render(entry);
        let details = self.details(entry);
        tracing::info!(
            target: AUDIT_TARGET,
            user_id = entry.user_id,
            resource_id = entry.resource_id,
            outcome = %entry.outcome,
            details = %details,
            "{message}"
        );
    }
}
