//! # fieldguard-acl
//!
//! Attribute-level access control for JSON resources.
//!
//! Given a caller, their roles, and a resource, this crate works out which
//! attributes the caller may see and returns a pruned copy of the document:
//!
//! - [`AccessRecordResolver`] merges explicit grants, or falls back to
//!   role-based default grants
//! - [`SecurityClassificationResolver`] caps visibility at the caller's
//!   highest role classification
//! - [`filter_document`] prunes the JSON tree to the READ-visible attributes
//! - [`FilteringOrchestrator`] composes the three and emits an audit event
//!
//! Grant storage sits behind the [`AccessLookup`] trait. [`MemoryLookup`]
//! serves grants from memory or from a JSON fixture.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fieldguard_acl::{AclConfig, FilterRequest, FilteringOrchestrator, MemoryLookup, Resource};
//!
//! # async fn run(resource: Resource) -> fieldguard_acl::Result<()> {
//! let lookup = MemoryLookup::from_json(r#"{"explicitAccess": []}"#)?;
//! let orchestrator = FilteringOrchestrator::new(Arc::new(lookup), AclConfig::default());
//! let request = FilterRequest::new("alice", ["caseworker"], resource);
//! if let Some(result) = orchestrator.filter_resource(&request).await? {
//!     println!("{:?}", result.resource.data);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod audit;
pub mod classification;
pub mod config;
pub mod error;
pub mod filter;
pub mod lookup;
pub mod orchestrator;
pub mod resolver;

#[cfg(test)]
mod proptests;

pub use audit::{AuditConfig, AuditEntry, AuditField, AuditOutcome, Auditor, AUDIT_TARGET};
pub use classification::{
    require_classification, resolve_classification, visible_classifications, ClassificationMap,
    SecurityClassificationResolver, UnclassifiedPolicy,
};
pub use config::{AclConfig, ClassificationConfig};
pub use error::{Error, Result};
pub use filter::filter_document;
pub use lookup::{AccessLookup, GrantFixture, MemoryLookup};
pub use orchestrator::{
    AccessReport, FilterRequest, FilteredResource, FilteredResult, FilteringOrchestrator,
    Resource,
};
pub use resolver::{AccessRecordResolver, ResolvedAccess};
