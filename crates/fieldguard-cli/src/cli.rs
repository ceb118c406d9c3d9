//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Fieldguard: attribute-level filtering of JSON resources
#[derive(Parser, Debug)]
#[command(name = "fieldguard", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filter a resource document for a caller
    Filter(FilterArgs),

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments to `fieldguard filter`.
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// JSON grant fixture (explicitAccess, defaultGrants, roleClassifications)
    #[arg(long)]
    pub grants: PathBuf,

    /// JSON resource: {"id", "definition", "data"}
    #[arg(long)]
    pub resource: PathBuf,

    /// Calling user id
    #[arg(long)]
    pub user: String,

    /// Caller role; repeat for several
    #[arg(long = "role")]
    pub roles: Vec<String>,

    /// JSON object mapping attribute pointers to classifications
    #[arg(long)]
    pub classifications: Option<PathBuf>,

    /// Pretty-print the result
    #[arg(long)]
    pub pretty: bool,
}

/// `fieldguard config` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the resolved config file path
    Path,

    /// Print a value by dotted key (e.g. `acl.audit.enabled`)
    Get {
        /// Dotted key
        key: String,
    },

    /// Write a default config file
    Init {
        /// Target file instead of the default location
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
