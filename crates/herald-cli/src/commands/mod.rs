//! CLI command handlers.

pub(crate) mod authorize;
pub(crate) mod capabilities;
pub(crate) mod config;
pub(crate) mod evaluate;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use herald_core::ContactPoint;
use herald_policy::ContactPointAction;

use crate::config_bridge::PolicyOverrides;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable, colored.
    #[default]
    Pretty,
    /// JSON on stdout.
    Json,
}

/// Which Alertmanager and caller to evaluate for.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct PolicyArgs {
    /// Alertmanager source name (`grafana` or a data source UID)
    #[arg(short, long)]
    pub(crate) alertmanager: Option<String>,

    /// Alertmanager flavor: grafana, mimir, cortex, prometheus, vanilla
    #[arg(long)]
    pub(crate) flavor: Option<String>,

    /// Granted access action; repeat for several. Replaces configured grants
    #[arg(short, long = "grant", value_name = "ACTION")]
    pub(crate) grants: Vec<String>,

    /// Enable the alerting API server feature toggle
    #[arg(long)]
    pub(crate) alerting_api_server: bool,

    /// Licensed feature; repeat for several
    #[arg(long = "license", value_name = "FEATURE")]
    pub(crate) license: Vec<String>,
}

impl From<PolicyArgs> for PolicyOverrides {
    fn from(args: PolicyArgs) -> Self {
        Self {
            alertmanager: args.alertmanager,
            flavor: args.flavor,
            grants: args.grants,
            alerting_api_server: args.alerting_api_server,
            license: args.license,
        }
    }
}

/// Contact-point actions accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ActionArg {
    /// Create a new contact point.
    AddContactPoint,
    /// Create a new notification template.
    AddTemplate,
    /// Export all notification configuration.
    ExportAll,
    /// Edit a contact point.
    Edit,
    /// View a contact point.
    View,
    /// Delete a contact point.
    Delete,
    /// Manage permissions of a contact point.
    ManagePermissions,
}

impl From<ActionArg> for ContactPointAction {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::AddContactPoint => Self::AddContactPoint,
            ActionArg::AddTemplate => Self::AddTemplate,
            ActionArg::ExportAll => Self::ExportAll,
            ActionArg::Edit => Self::Edit,
            ActionArg::View => Self::View,
            ActionArg::Delete => Self::Delete,
            ActionArg::ManagePermissions => Self::ManagePermissions,
        }
    }
}

/// Read a JSON array of contact points as returned by the API.
pub(crate) fn read_contact_points(path: &Path) -> Result<Vec<ContactPoint>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse contact points in {}", path.display()))
}

/// Print `value` as pretty JSON.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize output")?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_contact_points() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", herald_test::grafana_listing_json()).unwrap();

        let contact_points = read_contact_points(file.path()).unwrap();
        assert_eq!(contact_points.len(), 3);
        assert!(contact_points[1].provisioned);
    }

    #[test]
    fn test_read_contact_points_errors() {
        let err = read_contact_points(Path::new("/nonexistent/listing.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"not\": \"a list\"}}").unwrap();
        let err = read_contact_points(file.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn test_action_arg_conversion() {
        assert_eq!(
            ContactPointAction::from(ActionArg::ManagePermissions),
            ContactPointAction::ManagePermissions
        );
        assert!(ContactPointAction::from(ActionArg::ExportAll).is_page_level());
    }
}
