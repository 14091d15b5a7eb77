//! Authorize command - check one action on one contact point before acting.

use std::path::Path;

use anyhow::Result;
use herald_config::Config;
use herald_policy::{ContactPointAction, ContactPointCatalog, PolicyResult, listing};
use herald_telemetry::{RequestContext, RequestGuard};
use serde_json::json;

use super::{OutputFormat, print_json, read_contact_points};
use crate::config_bridge::{self, PolicyOverrides};
use crate::theme::Theme;

/// Outcome of an authorization check.
#[derive(Debug)]
pub(crate) struct Decision {
    /// Contact point that was checked.
    pub(crate) name: String,
    /// Action that was checked.
    pub(crate) action: ContactPointAction,
    /// `Ok` when the action may be attempted.
    pub(crate) outcome: PolicyResult<()>,
}

/// Check `action` on the contact point called `name` in the listing at `path`.
pub(crate) fn decide(
    cfg: &Config,
    overrides: &PolicyOverrides,
    path: &Path,
    name: &str,
    action: ContactPointAction,
) -> Result<Decision> {
    let (source, policy) = config_bridge::to_policy(cfg, overrides)?;
    let catalog = ContactPointCatalog::new(read_contact_points(path)?);

    let _guard = RequestGuard::new(
        RequestContext::new("authorize")
            .with_alertmanager(source.name())
            .with_operation(action.to_string())
            .with_metadata("contact_point", name),
    );
    let outcome = listing::authorize(&catalog, &policy, name, action).map(|_| ());
    if let Err(e) = &outcome {
        tracing::debug!(error = %e, "action refused");
    }

    Ok(Decision {
        name: name.to_string(),
        action,
        outcome,
    })
}

/// Print a decision. Returns whether the action is allowed.
pub(crate) fn report(decision: &Decision, format: OutputFormat) -> Result<bool> {
    let allowed = decision.outcome.is_ok();
    match format {
        OutputFormat::Json => print_json(&json!({
            "contact_point": decision.name,
            "action": decision.action,
            "allowed": allowed,
            "reason": decision.outcome.as_ref().err().map(ToString::to_string),
        }))?,
        OutputFormat::Pretty => match &decision.outcome {
            Ok(()) => println!(
                "{}",
                Theme::success(&format!("{} allowed on '{}'", decision.action, decision.name))
            ),
            Err(e) => println!("{}", Theme::error(&e.to_string())),
        },
    }
    Ok(allowed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_policy::{Denial, PolicyError};
    use std::io::Write;

    fn listing_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", herald_test::grafana_listing_json()).unwrap();
        file
    }

    fn editor() -> PolicyOverrides {
        PolicyOverrides {
            grants: vec![
                "alerting.notifications:read".into(),
                "alerting.notifications:write".into(),
            ],
            ..PolicyOverrides::default()
        }
    }

    #[test]
    fn test_delete_auto_routed_is_allowed() {
        let file = listing_file();
        let decision = decide(
            &Config::default(),
            &editor(),
            file.path(),
            "auto-routed",
            ContactPointAction::Delete,
        )
        .unwrap();
        assert!(decision.outcome.is_ok());
        assert!(report(&decision, OutputFormat::Json).unwrap());
    }

    #[test]
    fn test_delete_in_use_is_refused() {
        let file = listing_file();
        let decision = decide(
            &Config::default(),
            &editor(),
            file.path(),
            "grafana-default-email",
            ContactPointAction::Delete,
        )
        .unwrap();
        assert_eq!(
            decision.outcome,
            Err(PolicyError::StateConflict {
                action: ContactPointAction::Delete,
                reason: Denial::InUse { policies: 1 },
            })
        );
        assert!(!report(&decision, OutputFormat::Pretty).unwrap());
    }

    #[test]
    fn test_unknown_contact_point() {
        let file = listing_file();
        let decision = decide(
            &Config::default(),
            &editor(),
            file.path(),
            "gone",
            ContactPointAction::Edit,
        )
        .unwrap();
        assert!(matches!(decision.outcome, Err(PolicyError::NotFound { .. })));
    }

    #[test]
    fn test_export_on_mimir_is_unsupported() {
        let file = listing_file();
        let overrides = PolicyOverrides {
            alertmanager: Some("mimir".into()),
            grants: vec!["alerting.notifications.external:read".into()],
            ..PolicyOverrides::default()
        };
        let decision = decide(
            &Config::default(),
            &overrides,
            file.path(),
            "auto-routed",
            ContactPointAction::ExportAll,
        )
        .unwrap();
        assert!(matches!(
            decision.outcome,
            Err(PolicyError::CapabilityDenied {
                reason: Denial::Unsupported,
                ..
            })
        ));
    }
}
