//! Environment variable fallbacks.
//!
//! Env vars are **fallback**, not override: they only apply to fields that
//! no config file set.

use std::collections::HashMap;

use tracing::debug;

use crate::merge::{ConfigLayer, FieldSources};

/// Mapping from environment variable name to config field path.
struct EnvMapping {
    var_name: &'static str,
    field_path: &'static str,
}

/// All supported `HERALD_*` env var mappings.
const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "HERALD_ALERTMANAGER",
        field_path: "alertmanager.name",
    },
    EnvMapping {
        var_name: "HERALD_FLAVOR",
        field_path: "alertmanager.flavor",
    },
    EnvMapping {
        var_name: "HERALD_ALERTING_API_SERVER",
        field_path: "features.alerting_api_server",
    },
    EnvMapping {
        var_name: "HERALD_LICENSE_FEATURES",
        field_path: "license.features",
    },
    EnvMapping {
        var_name: "HERALD_GRANTS",
        field_path: "permissions.grants",
    },
    EnvMapping {
        var_name: "HERALD_LOG_LEVEL",
        field_path: "logging.level",
    },
    EnvMapping {
        var_name: "HERALD_LOG_FORMAT",
        field_path: "logging.format",
    },
];

/// Environment variables consulted, with the field each one fills.
pub fn env_var_names() -> impl Iterator<Item = (&'static str, &'static str)> {
    ENV_MAPPINGS.iter().map(|m| (m.var_name, m.field_path))
}

/// Apply environment variable fallbacks to fields that were **not** set by
/// any config file layer.
///
/// Returns the number of env vars applied.
pub fn apply_env_fallbacks<S: ::std::hash::BuildHasher>(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String, S>,
) -> usize {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        if sources
            .get(mapping.field_path)
            .is_some_and(ConfigLayer::is_file)
        {
            continue;
        }

        if let Some(val) = env_vars.get(mapping.var_name) {
            debug!(
                var = mapping.var_name,
                field = mapping.field_path,
                "applying env var fallback"
            );

            set_field_from_string(merged, mapping.field_path, val);
            sources.insert(mapping.field_path.to_owned(), ConfigLayer::Environment);
            count = count.saturating_add(1);
        }
    }

    count
}

/// Set a field in the TOML tree from a string value, creating the parent
/// table when missing.
fn set_field_from_string(root: &mut toml::Value, path: &str, val: &str) {
    let toml_val = coerce_to_toml_value(path, val);
    let segments: Vec<&str> = path.split('.').collect();
    let Some((leaf, parents)) = segments.split_last() else {
        return;
    };

    let mut current = root;
    for segment in parents {
        let Some(table) = current.as_table_mut() else {
            return;
        };
        current = table
            .entry((*segment).to_owned())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }

    if let Some(table) = current.as_table_mut() {
        table.insert((*leaf).to_owned(), toml_val);
    }
}

/// Coerce a string env var value to the TOML type of the field.
fn coerce_to_toml_value(path: &str, val: &str) -> toml::Value {
    // Known boolean fields.
    if path == "features.alerting_api_server"
        && let Ok(b) = val.trim().parse::<bool>()
    {
        return toml::Value::Boolean(b);
    }

    // Comma-separated list fields.
    if matches!(path, "permissions.grants" | "license.features") {
        return toml::Value::Array(
            val.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| toml::Value::String(s.to_owned()))
                .collect(),
        );
    }

    // Default: string.
    toml::Value::String(val.to_owned())
}

/// Collect all current environment variables into a map.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_apply_env_fallbacks() {
        let mut merged: toml::Value = toml::from_str("[logging]\nlevel = \"info\"").unwrap();
        let mut sources = FieldSources::new();
        sources.insert("logging.level".to_owned(), ConfigLayer::Defaults);
        let env = make_env(&[("HERALD_LOG_LEVEL", "debug")]);

        let count = apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(count, 1);
        assert_eq!(merged["logging"]["level"].as_str(), Some("debug"));
        assert_eq!(
            sources.get("logging.level"),
            Some(&ConfigLayer::Environment)
        );
    }

    #[test]
    fn test_env_fallback_skips_file_values() {
        let mut merged: toml::Value = toml::from_str("[logging]\nlevel = \"warn\"").unwrap();
        let mut sources = FieldSources::new();
        sources.insert("logging.level".to_owned(), ConfigLayer::User);

        let env = make_env(&[("HERALD_LOG_LEVEL", "debug")]);
        let count = apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(count, 0);
        assert_eq!(merged["logging"]["level"].as_str(), Some("warn"));
    }

    #[test]
    fn test_env_creates_missing_tables() {
        let mut merged = toml::Value::Table(toml::map::Map::new());
        let mut sources = FieldSources::new();
        let env = make_env(&[
            ("HERALD_ALERTMANAGER", "mimir-ds"),
            ("HERALD_FLAVOR", "mimir"),
        ]);

        assert_eq!(apply_env_fallbacks(&mut merged, &mut sources, &env), 2);
        assert_eq!(merged["alertmanager"]["name"].as_str(), Some("mimir-ds"));
        assert_eq!(merged["alertmanager"]["flavor"].as_str(), Some("mimir"));
    }

    #[test]
    fn test_coerce_types() {
        assert_eq!(
            coerce_to_toml_value("features.alerting_api_server", "true"),
            toml::Value::Boolean(true)
        );
        assert_eq!(
            coerce_to_toml_value("features.alerting_api_server", "yes"),
            toml::Value::String("yes".to_owned())
        );

        let grants = coerce_to_toml_value(
            "permissions.grants",
            "alerting.notifications:read, alerting.notifications:write,",
        );
        let grants = grants.as_array().unwrap();
        assert_eq!(grants.len(), 2);
        assert_eq!(grants[1].as_str(), Some("alerting.notifications:write"));
    }
}
