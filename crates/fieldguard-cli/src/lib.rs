//! # fieldguard-cli
//!
//! Library half of the `fieldguard` binary:
//! - argument definitions ([`cli`])
//! - the `filter` command, which runs a resource through the engine using a
//!   JSON grant fixture ([`commands`])
//! - configuration file loading and the `config` subcommands

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;
pub mod error;

pub use config::CliConfig;
pub use error::{Error, Result};
