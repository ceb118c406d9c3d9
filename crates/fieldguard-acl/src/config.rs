//! Engine configuration.
//!
//! ```toml
//! [audit]
//! enabled = true
//! template = "{user_id} requested {resource_id}: {outcome}"
//! fields = ["access_type", "visible_attributes"]
//!
//! [classification]
//! unclassified = "hide"
//! ```

use serde::{Deserialize, Serialize};

use crate::audit::AuditConfig;
use crate::classification::UnclassifiedPolicy;
use crate::error::{Error, Result};

/// Classification handling settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Treatment of attributes with no classification at or above them.
    pub unclassified: UnclassifiedPolicy,
}

/// Settings passed to [`FilteringOrchestrator`](crate::FilteringOrchestrator) at construction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AclConfig {
    /// Audit event settings.
    pub audit: AuditConfig,
    /// Classification settings.
    pub classification: ClassificationConfig,
}

impl AclConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the TOML is malformed or names an
    /// unknown setting value.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    /// Serializes to pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}
