//! Post-merge configuration validation.
//!
//! Validates that deserialized [`Config`](crate::Config) values name known
//! flavors, access actions and log formats, and that cross-field invariants
//! hold.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Reserved name of the Grafana-managed Alertmanager.
const GRAFANA_ALERTMANAGER_NAME: &str = "grafana";

/// Accepted flavor spellings and whether each denotes the Grafana flavor.
const FLAVORS: &[(&str, bool)] = &[
    ("grafana", true),
    ("mimir", false),
    ("cortex", false),
    ("prometheus", false),
    ("vanilla", false),
];

/// Accepted access-action identifiers.
const ACCESS_ACTIONS: &[&str] = &[
    "alerting.notifications:read",
    "alerting.notifications:write",
    "alerting.notifications.external:read",
    "alerting.notifications.external:write",
];

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];
const LOG_FORMATS: &[&str] = &["pretty", "compact", "json", "full"];

/// Flavor implied by an Alertmanager name when no flavor is configured.
///
/// The reserved name selects the Grafana flavor, any other name Mimir.
pub(crate) fn implied_flavor(name: &str) -> &'static str {
    if name == GRAFANA_ALERTMANAGER_NAME {
        "grafana"
    } else {
        "mimir"
    }
}

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_alertmanager(config)?;
    validate_permissions(config)?;
    validate_license(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_alertmanager(config: &Config) -> ConfigResult<()> {
    let am = &config.alertmanager;

    if am.name.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "alertmanager.name".to_owned(),
            message: "alertmanager name must not be empty".to_owned(),
        });
    }

    let flavor = am.flavor.trim().to_ascii_lowercase();
    let Some(&(_, is_grafana)) = FLAVORS.iter().find(|(name, _)| *name == flavor) else {
        return Err(ConfigError::ValidationError {
            field: "alertmanager.flavor".to_owned(),
            message: format!(
                "unknown flavor '{}'; expected one of: grafana, mimir, cortex, prometheus, vanilla",
                am.flavor
            ),
        });
    };

    let reserved = am.name == GRAFANA_ALERTMANAGER_NAME;
    if reserved != is_grafana {
        return Err(ConfigError::ValidationError {
            field: "alertmanager.flavor".to_owned(),
            message: format!(
                "alertmanager '{}' cannot use the '{}' flavor; the name '{GRAFANA_ALERTMANAGER_NAME}' \
                 is reserved for the grafana flavor",
                am.name, am.flavor
            ),
        });
    }

    Ok(())
}

fn validate_permissions(config: &Config) -> ConfigResult<()> {
    for grant in &config.permissions.grants {
        if !ACCESS_ACTIONS.contains(&grant.trim()) {
            return Err(ConfigError::ValidationError {
                field: "permissions.grants".to_owned(),
                message: format!(
                    "unknown access action '{grant}'; expected one of: {}",
                    ACCESS_ACTIONS.join(", ")
                ),
            });
        }
    }
    Ok(())
}

fn validate_license(config: &Config) -> ConfigResult<()> {
    if config
        .license
        .features
        .iter()
        .any(|f| f.trim().is_empty())
    {
        return Err(ConfigError::ValidationError {
            field: "license.features".to_owned(),
            message: "license feature names must not be empty".to_owned(),
        });
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;

    if !LOG_LEVELS.contains(&l.level.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.level".to_owned(),
            message: format!(
                "unknown log level '{}'; expected one of: {}",
                l.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if !LOG_FORMATS.contains(&l.format.as_str()) {
        return Err(ConfigError::ValidationError {
            field: "logging.format".to_owned(),
            message: format!(
                "unknown log format '{}'; expected one of: {}",
                l.format,
                LOG_FORMATS.join(", ")
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(result: ConfigResult<()>) -> String {
        match result {
            Err(ConfigError::ValidationError { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_config_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_external_alertmanager_valid() {
        let mut config = Config::default();
        config.alertmanager.name = "mimir-ds".to_owned();
        config.alertmanager.flavor = "Cortex".to_owned();
        config.permissions.grants = vec!["alerting.notifications.external:write".to_owned()];
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_unknown_flavor() {
        let mut config = Config::default();
        config.alertmanager.name = "am".to_owned();
        config.alertmanager.flavor = "opsgenie".to_owned();
        assert_eq!(field_of(validate(&config)), "alertmanager.flavor");
    }

    #[test]
    fn test_reserved_name_requires_grafana_flavor() {
        let mut config = Config::default();
        config.alertmanager.flavor = "mimir".to_owned();
        assert_eq!(field_of(validate(&config)), "alertmanager.flavor");

        let mut config = Config::default();
        config.alertmanager.name = "mimir-ds".to_owned();
        assert_eq!(field_of(validate(&config)), "alertmanager.flavor");
    }

    #[test]
    fn test_implied_flavor() {
        assert_eq!(implied_flavor("grafana"), "grafana");
        assert_eq!(implied_flavor("mimir-prod"), "mimir");
    }

    #[test]
    fn test_empty_name() {
        let mut config = Config::default();
        config.alertmanager.name = "  ".to_owned();
        assert_eq!(field_of(validate(&config)), "alertmanager.name");
    }

    #[test]
    fn test_unknown_grant() {
        let mut config = Config::default();
        config.permissions.grants = vec!["alerting.rules:read".to_owned()];
        assert_eq!(field_of(validate(&config)), "permissions.grants");
    }

    #[test]
    fn test_empty_license_feature() {
        let mut config = Config::default();
        config.license.features = vec![String::new()];
        assert_eq!(field_of(validate(&config)), "license.features");
    }

    #[test]
    fn test_logging() {
        let mut config = Config::default();
        config.logging.format = "xml".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.format");

        let mut config = Config::default();
        config.logging.level = "verbose".to_owned();
        assert_eq!(field_of(validate(&config)), "logging.level");
    }
}
