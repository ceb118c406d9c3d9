//! Error types for fieldguard-core

use thiserror::Error;

/// Result type alias for fieldguard-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding grants or resolving visibility.
///
/// None of these are caught inside the engine; they travel to the caller,
/// which maps them onto user-facing failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Attribute path does not follow the JSON Pointer grammar.
    #[error("Invalid attribute expression '{expression}': {reason}")]
    InvalidAttributeExpression {
        /// The rejected input
        expression: String,
        /// What is wrong with it
        reason: String,
    },

    /// Stored bitmask falls outside the known permission flags.
    #[error("Unsupported permission value: {value}")]
    UnsupportedPermissionValue {
        /// The rejected bitmask
        value: i64,
    },

    /// None of the caller's roles has a registered security classification.
    #[error("No security classification registered for roles [{}]", roles.join(", "))]
    NoMatchingRoleClassification {
        /// Roles that were looked up
        roles: Vec<String>,
    },

    /// Classification map has no entry at or above the given attribute.
    #[error("No security classification resolvable for attribute '{path}'")]
    UnresolvedRootClassification {
        /// Attribute whose ancestry was exhausted
        path: String,
    },
}

impl Error {
    /// Creates an invalid attribute expression error.
    pub fn invalid_attribute<E, R>(expression: E, reason: R) -> Self
    where
        E: Into<String>,
        R: Into<String>,
    {
        Error::InvalidAttributeExpression {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Whether the failure stems from caller-supplied input (vs. broken reference data).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::InvalidAttributeExpression { .. } => true,
            Error::NoMatchingRoleClassification { .. } => true,
            Error::UnsupportedPermissionValue { .. } => false,
            Error::UnresolvedRootClassification { .. } => false,
        }
    }
}
