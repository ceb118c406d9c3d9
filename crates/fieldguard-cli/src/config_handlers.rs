//! Handlers for `fieldguard config` subcommands.
//!
//! Keys are dotted paths into the TOML form of [`CliConfig`], so
//! `acl.audit.enabled` reads `[acl.audit] enabled`.

use std::path::PathBuf;

use crate::cli::ConfigAction;
use crate::config::{CliConfig, ConfigSource, PROJECT_NAME};
use crate::error::{Error, Result};

/// Dispatches a config subcommand.
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => cmd_config_path(config_path),
        ConfigAction::Get { key } => cmd_config_get(config_path, &key),
        ConfigAction::Init { file, force } => cmd_config_init(file.as_deref(), force).map(|_| ()),
    }
}

/// Prints the config file that would be loaded, and where the choice came from.
pub fn cmd_config_path(config_path: Option<&str>) -> Result<()> {
    let source = CliConfig::resolve_config_path(config_path)
        .ok_or_else(|| Error::config("No config directory on this platform; pass --config"))?;
    let path = source.path();
    println!("{}", path.display());

    if !path.exists() {
        match source {
            ConfigSource::Default(_) => eprintln!(
                "(not created yet; `{PROJECT_NAME} config init` writes one, defaults apply until then)"
            ),
            ConfigSource::Flag(_) | ConfigSource::Env(_) => {
                eprintln!("(file missing; loading it will fail)")
            }
        }
    }
    Ok(())
}

/// Prints one configuration value.
pub fn cmd_config_get(config_path: Option<&str>, key: &str) -> Result<()> {
    let config = CliConfig::load(config_path)?;
    println!("{}", lookup_key(&config, key)?);
    Ok(())
}

/// Formatted value at `key` in `config`.
pub fn lookup_key(config: &CliConfig, key: &str) -> Result<String> {
    let tree = toml::Value::try_from(config).map_err(|e| Error::config(e.to_string()))?;
    get_nested_value(&tree, key)
        .map(format_toml_value)
        .ok_or_else(|| Error::config(format!("No setting named '{key}'")))
}

/// Writes the default configuration and returns where it went.
pub fn cmd_config_init(file: Option<&str>, force: bool) -> Result<PathBuf> {
    let path = match file {
        Some(p) => PathBuf::from(p),
        None => CliConfig::default_config_path()
            .ok_or_else(|| Error::config("No config directory on this platform; pass --file"))?,
    };

    if path.exists() && !force {
        return Err(Error::config(format!(
            "{} exists; pass --force to replace it",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }

    let content = CliConfig::default().to_toml_string()?;
    std::fs::write(&path, content).map_err(|e| Error::io_with_path(e, &path))?;

    tracing::info!(path = %path.display(), "Wrote default config");
    println!("Wrote {}", path.display());
    Ok(path)
}

/// Follows a dotted key through nested TOML tables.
pub fn get_nested_value<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.')
        .try_fold(value, |node, part| node.as_table()?.get(part))
}

/// Renders a TOML value for stdout: scalars bare, arrays inline, tables as TOML.
pub fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(format_toml_value).collect();
            format!("[{}]", parts.join(", "))
        }
        toml::Value::Table(_) => {
            toml::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
