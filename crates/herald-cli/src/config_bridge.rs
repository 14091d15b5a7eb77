//! Bridge from `herald_config::Config` to domain types.
//!
//! The config crate carries plain strings so it stays independent of the
//! domain crates. Parsing into flavors and grants happens here, with command
//! line overrides layered on top.

use herald_config::Config;
use herald_core::{
    AlertmanagerFlavor, AlertmanagerSource, CallerPermissions, CoreResult, FeatureFlags,
    GRAFANA_ALERTMANAGER_NAME, LicenseFeatures,
};
use herald_policy::ContactPointActionPolicy;
use herald_telemetry::LogConfig;

/// Command line values that take precedence over the configuration.
#[derive(Debug, Clone, Default)]
pub(crate) struct PolicyOverrides {
    /// Alertmanager source name.
    pub(crate) alertmanager: Option<String>,
    /// Alertmanager flavor.
    pub(crate) flavor: Option<String>,
    /// Grants replacing `[permissions] grants` when non-empty.
    pub(crate) grants: Vec<String>,
    /// Turn the alerting API server toggle on.
    pub(crate) alerting_api_server: bool,
    /// License features added to `[license] features`.
    pub(crate) license: Vec<String>,
}

/// Convert the `[logging]` section to a [`LogConfig`].
///
/// Colors are dropped when the log stream is not a terminal.
pub(crate) fn to_log_config(cfg: &Config, terminal: bool) -> LogConfig {
    let config = LogConfig::from(&cfg.logging);
    if terminal { config } else { config.without_ansi() }
}

/// Resolve the selected Alertmanager.
///
/// A name given on the command line without a flavor does not inherit the
/// configured flavor: `grafana` selects the Grafana flavor and anything else
/// is a data source, which defaults to Mimir.
pub(crate) fn to_source(cfg: &Config, overrides: &PolicyOverrides) -> CoreResult<AlertmanagerSource> {
    let (name, configured_flavor) = match overrides.alertmanager.as_deref() {
        Some(name) => (name, None),
        None => (
            cfg.alertmanager.name.as_str(),
            Some(cfg.alertmanager.flavor.as_str()),
        ),
    };

    let flavor = match overrides.flavor.as_deref().or(configured_flavor) {
        Some(flavor) => flavor.parse()?,
        None if name == GRAFANA_ALERTMANAGER_NAME => AlertmanagerFlavor::Grafana,
        None => AlertmanagerFlavor::Mimir,
    };

    AlertmanagerSource::new(name, flavor)
}

/// Feature toggles from `[features]` plus overrides.
pub(crate) fn to_feature_flags(cfg: &Config, overrides: &PolicyOverrides) -> FeatureFlags {
    FeatureFlags {
        alerting_api_server: cfg.features.alerting_api_server || overrides.alerting_api_server,
    }
}

/// License features from `[license]` plus overrides.
pub(crate) fn to_license(cfg: &Config, overrides: &PolicyOverrides) -> LicenseFeatures {
    LicenseFeatures::from_features(cfg.license.features.iter().chain(&overrides.license))
}

/// Caller grants: the command line replaces the configured set.
pub(crate) fn to_permissions(
    cfg: &Config,
    overrides: &PolicyOverrides,
) -> CoreResult<CallerPermissions> {
    if overrides.grants.is_empty() {
        CallerPermissions::parse(&cfg.permissions.grants)
    } else {
        CallerPermissions::parse(&overrides.grants)
    }
}

/// Build the action policy for the resolved inputs.
pub(crate) fn to_policy(
    cfg: &Config,
    overrides: &PolicyOverrides,
) -> CoreResult<(AlertmanagerSource, ContactPointActionPolicy)> {
    let source = to_source(cfg, overrides)?;
    let policy = ContactPointActionPolicy::for_source(
        &source,
        &to_feature_flags(cfg, overrides),
        to_permissions(cfg, overrides)?,
        to_license(cfg, overrides),
    );
    Ok((source, policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::{AccessAction, CoreError, PermissionScope};

    fn overrides() -> PolicyOverrides {
        PolicyOverrides::default()
    }

    #[test]
    fn test_default_config_selects_grafana() {
        let source = to_source(&Config::default(), &overrides()).unwrap();
        assert!(source.is_grafana_managed());
        assert_eq!(source.flavor(), AlertmanagerFlavor::Grafana);
    }

    #[test]
    fn test_named_data_source_defaults_to_mimir() {
        let ov = PolicyOverrides {
            alertmanager: Some("ops-am".into()),
            ..overrides()
        };
        let source = to_source(&Config::default(), &ov).unwrap();
        assert_eq!(source.name(), "ops-am");
        assert_eq!(source.flavor(), AlertmanagerFlavor::Mimir);
    }

    #[test]
    fn test_flavor_override() {
        let ov = PolicyOverrides {
            alertmanager: Some("vanilla-alertmanager".into()),
            flavor: Some("vanilla".into()),
            ..overrides()
        };
        let source = to_source(&Config::default(), &ov).unwrap();
        assert_eq!(source.flavor(), AlertmanagerFlavor::Prometheus);
    }

    #[test]
    fn test_configured_source() {
        let mut cfg = Config::default();
        cfg.alertmanager.name = "cortex-am".into();
        cfg.alertmanager.flavor = "cortex".into();
        let source = to_source(&cfg, &overrides()).unwrap();
        assert_eq!(source.flavor(), AlertmanagerFlavor::Mimir);
    }

    #[test]
    fn test_grafana_name_with_external_flavor_is_rejected() {
        let ov = PolicyOverrides {
            flavor: Some("mimir".into()),
            ..overrides()
        };
        let err = to_source(&Config::default(), &ov).unwrap_err();
        assert!(matches!(err, CoreError::FlavorMismatch { .. }));
    }

    #[test]
    fn test_unknown_flavor() {
        let ov = PolicyOverrides {
            flavor: Some("loki".into()),
            ..overrides()
        };
        assert!(matches!(
            to_source(&Config::default(), &ov),
            Err(CoreError::UnknownFlavor(_))
        ));
    }

    #[test]
    fn test_command_line_grants_replace_configured() {
        let mut cfg = Config::default();
        cfg.permissions.grants = vec!["alerting.notifications:read".into()];

        let perms = to_permissions(&cfg, &overrides()).unwrap();
        assert!(perms.can_read(PermissionScope::Internal));
        assert!(!perms.can_write(PermissionScope::Internal));

        let ov = PolicyOverrides {
            grants: vec!["alerting.notifications:write".into()],
            ..overrides()
        };
        let perms = to_permissions(&cfg, &ov).unwrap();
        assert!(perms.has(AccessAction::NotificationsWrite));
        assert!(!perms.has(AccessAction::NotificationsRead));
    }

    #[test]
    fn test_unknown_grant_is_rejected() {
        let ov = PolicyOverrides {
            grants: vec!["alerting.rules:read".into()],
            ..overrides()
        };
        assert!(matches!(
            to_permissions(&Config::default(), &ov),
            Err(CoreError::UnknownAccessAction(_))
        ));
    }

    #[test]
    fn test_features_and_license_are_additive() {
        let mut cfg = Config::default();
        cfg.license.features = vec!["reporting".into()];
        let ov = PolicyOverrides {
            alerting_api_server: true,
            license: vec!["accesscontrol".into()],
            ..overrides()
        };

        assert!(to_feature_flags(&cfg, &ov).alerting_api_server);
        let license = to_license(&cfg, &ov);
        assert!(license.has_access_control());
        assert!(license.is_enabled("reporting"));
    }

    #[test]
    fn test_to_policy() {
        let ov = PolicyOverrides {
            grants: vec![
                "alerting.notifications:read".into(),
                "alerting.notifications:write".into(),
            ],
            alerting_api_server: true,
            license: vec!["accesscontrol".into()],
            ..overrides()
        };
        let (source, policy) = to_policy(&Config::default(), &ov).unwrap();
        assert!(source.is_grafana_managed());
        assert!(policy.capabilities().supports_resource_permissions());
        assert!(policy.page_actions().add_contact_point.is_enabled());
    }

    #[test]
    fn test_log_config_from_logging_section() {
        let mut cfg = Config::default();
        cfg.logging.level = "debug".into();
        cfg.logging.directives = vec!["herald_policy=trace".into()];
        let log = to_log_config(&cfg, true);
        assert_eq!(log.level, "debug");
        assert_eq!(log.directives, vec!["herald_policy=trace".to_string()]);
        assert!(log.ansi);
    }

    #[test]
    fn test_log_config_without_terminal_drops_colors() {
        let log = to_log_config(&Config::default(), false);
        assert!(!log.ansi);
        assert_eq!(log.level, "info");
    }
}
