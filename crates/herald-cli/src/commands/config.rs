//! CLI handlers for the `herald config` subcommand.

use std::path::Path;

use anyhow::Result;
use herald_config::merge::FieldSources;
use herald_config::{Config, ConfigResult, ResolvedConfig, ShowFormat, env::env_var_names};

use crate::theme::Theme;

/// Resolve the configuration from `path` alone, or through the layered
/// lookup rooted at the current directory.
///
/// A single file has no per-field sources to report.
fn resolve(path: Option<&Path>) -> ConfigResult<ResolvedConfig> {
    match path {
        Some(path) => Ok(ResolvedConfig {
            config: Config::load_file(path)?,
            field_sources: FieldSources::new(),
            loaded_files: vec![path.display().to_string()],
        }),
        None => {
            let workspace_root = std::env::current_dir().ok();
            Config::load(workspace_root.as_deref())
        },
    }
}

/// Show the resolved configuration with source annotations.
pub(crate) fn show_config(path: Option<&Path>, format: &str, section: Option<&str>) -> Result<()> {
    let resolved = resolve(path)?;

    let show_format = match format {
        "json" => ShowFormat::Json,
        _ => ShowFormat::Toml,
    };

    let output = resolved.show(show_format, section).map_err(|_| match section {
        Some(name) => anyhow::anyhow!("unknown config section: {name}"),
        None => anyhow::anyhow!("failed to format config"),
    })?;

    println!("{output}");
    Ok(())
}

/// Validate the configuration. Returns whether it is valid.
pub(crate) fn validate_config(path: Option<&Path>) -> Result<bool> {
    match resolve(path) {
        Ok(resolved) => {
            println!("{}", Theme::success("Configuration is valid."));
            if !resolved.loaded_files.is_empty() {
                println!("\nLoaded files:");
                for path in &resolved.loaded_files {
                    println!("  - {path}");
                }
            }
            Ok(true)
        },
        Err(e) => {
            eprintln!("{}", Theme::error(&format!("Configuration error: {e}")));
            Ok(false)
        },
    }
}

/// Show all config file paths that are checked.
#[allow(clippy::unnecessary_wraps)]
pub(crate) fn show_paths() -> Result<()> {
    let home = directories::BaseDirs::new().map(|d| d.home_dir().to_string_lossy().to_string());

    let workspace = std::env::current_dir()
        .ok()
        .map(|p| p.to_string_lossy().to_string());

    let paths = ResolvedConfig::config_paths(home.as_deref(), workspace.as_deref());

    println!("Configuration files checked (in precedence order):\n");
    for (i, path) in paths.iter().enumerate() {
        let status = if std::path::Path::new(path).exists() {
            "found"
        } else {
            "not found"
        };
        println!("  {}. {path}  [{status}]", i.saturating_add(1));
    }

    println!("\nEnvironment variable fallbacks:");
    for (var, field) in env_var_names() {
        println!("  {var:<28} -> {field}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_file(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("herald.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_resolve_single_file() {
        let (_dir, path) = config_file("[alertmanager]\nname = \"ops\"\nflavor = \"prometheus\"\n");

        let resolved = resolve(Some(&path)).unwrap();
        assert_eq!(resolved.config.alertmanager.flavor, "prometheus");
        assert_eq!(resolved.loaded_files, vec![path.display().to_string()]);
        assert!(resolved.field_sources.is_empty());
    }

    #[test]
    fn test_validate_single_file() {
        let (_dir, valid) = config_file("[logging]\nlevel = \"debug\"\n");
        assert!(validate_config(Some(&valid)).unwrap());

        let (_dir, broken) = config_file("[permissions]\ngrants = [\"admin\"]\n");
        assert!(!validate_config(Some(&broken)).unwrap());
    }

    #[test]
    fn test_show_single_file_section() {
        let (_dir, path) = config_file("[alertmanager]\nname = \"mimir-prod\"\n");
        assert!(show_config(Some(&path), "json", Some("alertmanager")).is_ok());
        assert!(show_config(Some(&path), "toml", Some("nope")).is_err());
    }
}
