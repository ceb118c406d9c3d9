//! The `filter` command.

use std::path::Path;
use std::sync::Arc;

use fieldguard_acl::{
    ClassificationMap, FilterRequest, FilteredResult, FilteringOrchestrator, MemoryLookup,
    Resource,
};
use serde::de::DeserializeOwned;

use crate::cli::FilterArgs;
use crate::config::CliConfig;
use crate::error::{Error, Result};

/// Runs `fieldguard filter` and returns the JSON to print.
///
/// A caller with no access produces `null`.
pub async fn handle_filter_command(config: &CliConfig, args: &FilterArgs) -> Result<String> {
    let result = run_filter(config, args).await?;
    render(result.as_ref(), args.pretty)
}

/// Loads the inputs named by `args` and filters the resource.
pub async fn run_filter(config: &CliConfig, args: &FilterArgs) -> Result<Option<FilteredResult>> {
    let grants = read_file(&args.grants)?;
    let lookup = MemoryLookup::from_json(&grants)?;
    let resource: Resource = read_json("resource", &args.resource)?;

    let mut request = FilterRequest::new(&args.user, &args.roles, resource);
    if let Some(path) = &args.classifications {
        let classifications: ClassificationMap = read_json("classification map", path)?;
        request = request.with_classifications(classifications);
    }

    tracing::debug!(
        user = %args.user,
        roles = ?args.roles,
        resource = %request.resource.id,
        classified = request.classifications.is_some(),
        "Filtering resource"
    );

    let orchestrator = FilteringOrchestrator::new(Arc::new(lookup), config.acl.clone());
    let result = orchestrator.filter_resource(&request).await?;
    if result.is_none() {
        tracing::info!(user = %args.user, resource = %request.resource.id, "No access");
    }
    Ok(result)
}

/// Serializes a filtering result.
pub fn render(result: Option<&FilteredResult>, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    };
    rendered.map_err(|e| Error::config(format!("Failed to serialize result: {e}")))
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))
}

fn read_json<T: DeserializeOwned>(what: &'static str, path: &Path) -> Result<T> {
    let content = read_file(path)?;
    serde_json::from_str(&content).map_err(|e| Error::json(what, path, e))
}
