//! Configuration types for Herald.
//!
//! All types in this module are self-contained with no dependencies on other
//! internal herald crates. Flavors, access actions and license features are
//! kept as plain strings here and converted to domain types at the boundary.
//! Every struct implements [`Default`] so that a bare `[section]` header in
//! TOML produces a working configuration.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which Alertmanager contact points are evaluated against.
    pub alertmanager: AlertmanagerSection,
    /// Feature toggles.
    pub features: FeaturesSection,
    /// Active license features.
    pub license: LicenseSection,
    /// Caller grants used when none are given on the command line.
    pub permissions: PermissionsSection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// AlertmanagerSection
// ---------------------------------------------------------------------------

/// The selected Alertmanager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertmanagerSection {
    /// Source name; `"grafana"` is the Grafana-managed Alertmanager,
    /// anything else is a data source UID.
    pub name: String,
    /// Implementation flavor: `"grafana"`, `"mimir"` (or `"cortex"`),
    /// `"prometheus"` (or `"vanilla"`).
    pub flavor: String,
}

impl Default for AlertmanagerSection {
    fn default() -> Self {
        Self {
            name: "grafana".to_owned(),
            flavor: "grafana".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// FeaturesSection
// ---------------------------------------------------------------------------

/// Feature toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesSection {
    /// Contact points are served by the alerting API server, which carries
    /// per-resource permissions.
    pub alerting_api_server: bool,
}

// ---------------------------------------------------------------------------
// LicenseSection
// ---------------------------------------------------------------------------

/// License features.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseSection {
    /// Enabled feature names, e.g. `["accesscontrol"]`.
    pub features: Vec<String>,
}

// ---------------------------------------------------------------------------
// PermissionsSection
// ---------------------------------------------------------------------------

/// Default caller grants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionsSection {
    /// Access-action identifiers, e.g. `"alerting.notifications:read"`.
    pub grants: Vec<String>,
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"`, or `"full"`.
    pub format: String,
    /// Per-crate tracing directives (e.g. `["herald_policy=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directives: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_sections_use_defaults() {
        let config: Config = toml::from_str("[alertmanager]\n[logging]\n").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_section() {
        let config: Config = toml::from_str(
            r#"
            [alertmanager]
            name = "mimir-ds"
            flavor = "mimir"

            [permissions]
            grants = ["alerting.notifications.external:read"]
        "#,
        )
        .unwrap();

        assert_eq!(config.alertmanager.name, "mimir-ds");
        assert_eq!(config.permissions.grants.len(), 1);
        assert_eq!(config.logging.level, "info");
        assert!(!config.features.alerting_api_server);
    }
}
