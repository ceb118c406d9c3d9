//! Fieldguard Core: data model for attribute-level access control.
//!
//! This crate has no internal Fieldguard dependencies. It defines the values
//! the engine in `fieldguard-acl` computes with.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`permission`]: Permissions and the bitmask codec
//! - [`path`]: JSON Pointer attribute paths
//! - [`merge`]: Permission maps and their union
//! - [`classification`]: Security classifications and access types
//! - [`grant`]: Grant records supplied by persistence

#![forbid(unsafe_code)]

pub mod classification;
pub mod error;
pub mod grant;
pub mod merge;
pub mod path;
pub mod permission;

mod proptests;

pub use classification::{AccessType, RoleClassification, SecurityClassification};
pub use error::{Error, Result};
pub use grant::{AccessGrantRecord, AccessorType, DefaultRoleGrant, ResourceDefinition};
pub use merge::{add_permissions, merge_permissions, PermissionMap};
pub use path::AttributePath;
pub use permission::{Permission, PermissionSet};
