//! Source-annotated display for `config show`.
//!
//! Prints the resolved configuration with annotations showing which layer
//! (defaults, system, user, workspace, environment) set each value.

use std::fmt::{self, Write as _};

use crate::merge::FieldSources;
use crate::types::Config;

/// A resolved configuration together with source annotations.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The final merged configuration.
    pub config: Config,
    /// Dotted field path → which layer set the value.
    pub field_sources: FieldSources,
    /// Config file paths that were loaded (in precedence order).
    pub loaded_files: Vec<String>,
}

/// Output format for `config show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowFormat {
    /// TOML with inline comments showing source.
    Toml,
    /// JSON (for programmatic consumption).
    Json,
}

impl ResolvedConfig {
    /// Format the resolved config, optionally restricted to one section.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the section does not exist.
    pub fn show(&self, format: ShowFormat, section: Option<&str>) -> Result<String, fmt::Error> {
        match format {
            ShowFormat::Toml => self.show_toml(section),
            ShowFormat::Json => self.show_json(section),
        }
    }

    fn section_value(&self, section: &str) -> Result<toml::Value, fmt::Error> {
        let val = toml::Value::try_from(&self.config).map_err(|_| fmt::Error)?;
        val.as_table()
            .and_then(|table| table.get(section))
            .cloned()
            .ok_or(fmt::Error)
    }

    fn show_toml(&self, section: Option<&str>) -> Result<String, fmt::Error> {
        let toml_str = if let Some(section_name) = section {
            toml::to_string_pretty(&self.section_value(section_name)?).map_err(|_| fmt::Error)?
        } else {
            toml::to_string_pretty(&self.config).map_err(|_| fmt::Error)?
        };

        let mut output = String::new();
        output.push_str("# Resolved Herald Configuration\n");
        output.push_str("# Source annotations: [defaults] [system] [user] [workspace] [env]\n");

        if !self.loaded_files.is_empty() {
            output.push_str("#\n# Loaded files (in precedence order):\n");
            for (i, path) in self.loaded_files.iter().enumerate() {
                writeln!(output, "#   {}. {path}", i.saturating_add(1))?;
            }
        }

        output.push('\n');

        // Section headers reset the key prefix.
        let mut prefix = section.unwrap_or("").to_owned();
        for line in toml_str.lines() {
            let trimmed = line.trim();
            if let Some(header) = trimmed
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
            {
                header.clone_into(&mut prefix);
            }

            if let Some(annotation) = self.annotate_line(trimmed, &prefix) {
                writeln!(output, "{line}  # {annotation}")?;
            } else {
                output.push_str(line);
                output.push('\n');
            }
        }

        Ok(output)
    }

    fn show_json(&self, section: Option<&str>) -> Result<String, fmt::Error> {
        if let Some(section_name) = section {
            serde_json::to_string_pretty(&self.section_value(section_name)?)
                .map_err(|_| fmt::Error)
        } else {
            serde_json::to_string_pretty(&self.config).map_err(|_| fmt::Error)
        }
    }

    /// Source annotation for a `key = value` line.
    fn annotate_line(&self, trimmed: &str, prefix: &str) -> Option<String> {
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('[') {
            return None;
        }

        let key = trimmed.split('=').next()?.trim();
        let field_path = if prefix.is_empty() {
            key.to_owned()
        } else {
            format!("{prefix}.{key}")
        };

        self.field_sources
            .get(&field_path)
            .map(|layer| format!("[{layer}]"))
    }

    /// List all config file paths that are checked during loading.
    #[must_use]
    pub fn config_paths(home_dir: Option<&str>, workspace_root: Option<&str>) -> Vec<String> {
        let mut paths = vec!["/etc/herald/config.toml".to_owned()];

        if let Some(home) = home_dir {
            paths.push(format!("{home}/.herald/config.toml"));
        } else {
            paths.push("~/.herald/config.toml".to_owned());
        }

        if let Some(ws) = workspace_root {
            paths.push(format!("{ws}/.herald/config.toml"));
        } else {
            paths.push("{workspace}/.herald/config.toml".to_owned());
        }

        paths
    }
}
