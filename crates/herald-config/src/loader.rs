//! Config file discovery and layered loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Parse `defaults.toml` → base
//! 2. Merge `/etc/herald/config.toml` (system)
//! 3. Merge `~/.herald/config.toml` (user)
//! 4. Merge `{workspace}/.herald/config.toml` (workspace) + restriction enforcement
//! 5. Apply env var fallbacks for unset fields
//! 6. Imply `alertmanager.flavor` from the name when no layer set it
//! 7. Deserialize merged tree → `Config`
//! 8. Validate
//! 9. Return `ResolvedConfig`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources, deep_merge_tracking, enforce_restrictions};
use crate::show::ResolvedConfig;
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// System-wide config location.
const SYSTEM_CONFIG_PATH: &str = "/etc/herald/config.toml";

/// Load the configuration with layered file precedence.
///
/// `workspace_root` is the root of the current project. If `None`, the
/// workspace layer is skipped.
///
/// `herald_home_override` is used as the `.herald` directory itself instead
/// of `~/.herald`.
///
/// # Errors
///
/// Returns a [`ConfigError`] if any config file is malformed, or if the
/// final merged configuration fails validation.
pub fn load(
    workspace_root: Option<&Path>,
    herald_home_override: Option<&Path>,
) -> ConfigResult<ResolvedConfig> {
    load_with_env(workspace_root, herald_home_override, &collect_env_vars())
}

/// [`load`] with an explicit environment instead of the process environment.
///
/// # Errors
///
/// See [`load`].
pub fn load_with_env<S: ::std::hash::BuildHasher>(
    workspace_root: Option<&Path>,
    herald_home_override: Option<&Path>,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<ResolvedConfig> {
    // 1. Parse embedded defaults.
    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;

    let mut field_sources = FieldSources::new();
    let mut loaded_files = Vec::new();
    record_defaults(&merged, "", &mut field_sources);

    // 2. System config.
    let system_path = PathBuf::from(SYSTEM_CONFIG_PATH);
    if let Some(overlay) = try_load_file(&system_path)? {
        deep_merge_tracking(
            &mut merged,
            &overlay,
            "",
            &ConfigLayer::System,
            &mut field_sources,
        );
        loaded_files.push(system_path.display().to_string());
        info!(path = %system_path.display(), "loaded system config");
    }

    // 3. User config.
    let user_path = match herald_home_override {
        Some(dir) => dir.join("config.toml"),
        None => home_directory()?.join(".herald").join("config.toml"),
    };
    if let Some(overlay) = try_load_file(&user_path)? {
        deep_merge_tracking(
            &mut merged,
            &overlay,
            "",
            &ConfigLayer::User,
            &mut field_sources,
        );
        loaded_files.push(user_path.display().to_string());
        info!(path = %user_path.display(), "loaded user config");
    }

    // 4. Workspace config. The pre-workspace snapshot is the baseline the
    //    workspace layer may only narrow.
    if let Some(ws_root) = workspace_root {
        let ws_path = ws_root.join(".herald").join("config.toml");
        if let Some(overlay) = try_load_file(&ws_path)? {
            let baseline = merged.clone();
            let baseline_sources = field_sources.clone();
            deep_merge_tracking(
                &mut merged,
                &overlay,
                "",
                &ConfigLayer::Workspace,
                &mut field_sources,
            );
            for field in enforce_restrictions(&mut merged, &baseline, &overlay) {
                restore_sources(&mut field_sources, &baseline_sources, field);
            }

            loaded_files.push(ws_path.display().to_string());
            info!(path = %ws_path.display(), "loaded workspace config");
        }
    }

    // 5. Env var fallbacks.
    let env_count = apply_env_fallbacks(&mut merged, &mut field_sources, env_vars);
    if env_count > 0 {
        debug!(count = env_count, "applied environment variable fallbacks");
    }

    // 6. Flavor implied by the name.
    imply_flavor(&mut merged, &mut field_sources);

    // 7. Deserialize.
    let config: Config =
        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: "<merged config>".to_owned(),
                source: e,
            })?;

    // 8. Validate.
    validate::validate(&config)?;

    Ok(ResolvedConfig {
        config,
        field_sources,
        loaded_files,
    })
}

/// Load a config from a specific file path (no layering).
///
/// Fields the file omits take their default values.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
/// validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let metadata = std::fs::metadata(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(oversized(path, metadata.len()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut value: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;

    if let Some(am) = value.get_mut("alertmanager").and_then(toml::Value::as_table_mut)
        && !am.contains_key("flavor")
        && let Some(name) = am.get("name").and_then(toml::Value::as_str)
    {
        let flavor = validate::implied_flavor(name);
        am.insert("flavor".to_owned(), toml::Value::String(flavor.to_owned()));
    }

    let config: Config =
        value
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: path.display().to_string(),
                source: e,
            })?;

    validate::validate(&config)?;
    Ok(config)
}

/// Set `alertmanager.flavor` from `alertmanager.name` when the name was
/// configured and the flavor was left at its default.
///
/// The implied flavor is credited to the layer that set the name.
fn imply_flavor(merged: &mut toml::Value, sources: &mut FieldSources) {
    if sources
        .get("alertmanager.flavor")
        .is_some_and(|layer| *layer != ConfigLayer::Defaults)
    {
        return;
    }
    let Some(layer) = sources
        .get("alertmanager.name")
        .filter(|layer| **layer != ConfigLayer::Defaults)
        .cloned()
    else {
        return;
    };
    let Some(am) = merged.get_mut("alertmanager").and_then(toml::Value::as_table_mut) else {
        return;
    };
    let Some(flavor) = am
        .get("name")
        .and_then(toml::Value::as_str)
        .map(validate::implied_flavor)
    else {
        return;
    };

    debug!(flavor, "implied alertmanager flavor from its name");
    am.insert("flavor".to_owned(), toml::Value::String(flavor.to_owned()));
    sources.insert("alertmanager.flavor".to_owned(), layer);
}

/// Point the sources of a reverted field back at the layers that set the
/// baseline value.
fn restore_sources(sources: &mut FieldSources, baseline: &FieldSources, field: &str) {
    let nested = format!("{field}.");
    let covers = |path: &str| path == field || path.starts_with(&nested);

    sources.retain(|path, _| !covers(path.as_str()));
    for (path, layer) in baseline {
        if covers(path.as_str()) {
            sources.insert(path.clone(), layer.clone());
        }
    }
}

/// Try to load a file, returning `None` if the file doesn't exist.
///
/// Reads once and checks the size afterwards, with no separate exists or
/// metadata call.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file not found, skipping");
            return Ok(None);
        },
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            });
        },
    };

    let len = u64::try_from(content.len()).unwrap_or(u64::MAX);
    if len > MAX_CONFIG_FILE_SIZE {
        return Err(oversized(path, len));
    }

    let value: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(Some(value))
}

fn oversized(path: &Path, len: u64) -> ConfigError {
    ConfigError::ValidationError {
        field: path.display().to_string(),
        message: format!(
            "config file is {len} bytes, exceeding the {MAX_CONFIG_FILE_SIZE} byte limit"
        ),
    }
}

/// Determine the user's home directory.
fn home_directory() -> ConfigResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDir)
}

/// Mark all leaf values in the defaults tree with the `Defaults` layer.
fn record_defaults(val: &toml::Value, prefix: &str, sources: &mut FieldSources) {
    if let toml::Value::Table(table) = val {
        for (key, child) in table {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            record_defaults(child, &path, sources);
        }
    } else {
        sources.insert(prefix.to_owned(), ConfigLayer::Defaults);
    }
}
