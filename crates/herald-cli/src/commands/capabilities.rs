//! Capabilities command - print what each Alertmanager flavor supports.

use anyhow::Result;
use herald_core::{AlertmanagerCapabilities, AlertmanagerFlavor, FeatureFlags};
use serde_json::json;

use super::{OutputFormat, print_json};
use crate::theme::Theme;

/// Capabilities of one flavor, or of all flavors when `flavor` is `None`.
pub(crate) fn matrix(
    flavor: Option<&str>,
    features: &FeatureFlags,
) -> Result<Vec<(AlertmanagerFlavor, AlertmanagerCapabilities)>> {
    let flavors = match flavor {
        Some(f) => vec![f.parse::<AlertmanagerFlavor>()?],
        None => AlertmanagerFlavor::ALL.to_vec(),
    };
    Ok(flavors
        .into_iter()
        .map(|f| (f, AlertmanagerCapabilities::for_flavor(f, features)))
        .collect())
}

/// Print the capability matrix.
pub(crate) fn show_capabilities(
    flavor: Option<&str>,
    features: &FeatureFlags,
    format: OutputFormat,
) -> Result<()> {
    let rows = matrix(flavor, features)?;

    if format == OutputFormat::Json {
        let entries: Vec<_> = rows
            .iter()
            .map(|(flavor, caps)| json!({ "flavor": flavor, "capabilities": caps }))
            .collect();
        return print_json(&entries);
    }

    println!("\n{}", Theme::header("Alertmanager capabilities"));
    if features.alerting_api_server {
        println!("{}", Theme::dimmed("alerting API server enabled"));
    }
    println!(
        "{:<12} {:<10} {:<9} {:<13} {:<8} {}",
        "FLAVOR", "SCOPE", "EDITING", "PROVISIONING", "EXPORT", "PERMISSIONS"
    );
    println!("{}", Theme::separator());
    for (flavor, caps) in &rows {
        // Pad before coloring so ANSI codes do not skew the columns.
        println!(
            "{:<12} {:<10} {} {} {} {}",
            flavor.to_string(),
            caps.scope().to_string(),
            pad(&Theme::flag(caps.supports_editing()), caps.supports_editing(), 9),
            pad(&Theme::flag(caps.supports_provisioning()), caps.supports_provisioning(), 13),
            pad(&Theme::flag(caps.supports_export()), caps.supports_export(), 8),
            Theme::flag(caps.supports_resource_permissions()),
        );
    }
    println!();
    Ok(())
}

fn pad(colored: &str, enabled: bool, width: usize) -> String {
    let visible = if enabled { 3 } else { 2 };
    format!("{colored}{}", " ".repeat(width.saturating_sub(visible)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::PermissionScope;

    #[test]
    fn test_full_matrix() {
        let rows = matrix(None, &FeatureFlags::default()).unwrap();
        assert_eq!(rows.len(), 3);

        let (_, grafana) = rows[0];
        assert_eq!(grafana.scope(), PermissionScope::Internal);
        assert!(grafana.supports_export());
        assert!(!grafana.supports_resource_permissions());

        let (_, prometheus) = rows[2];
        assert!(!prometheus.supports_editing());
    }

    #[test]
    fn test_single_flavor_alias() {
        let rows = matrix(Some("cortex"), &FeatureFlags::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, AlertmanagerFlavor::Mimir);
        assert!(!rows[0].1.supports_provisioning());
    }

    #[test]
    fn test_api_server_toggle() {
        let features = FeatureFlags::default().with_alerting_api_server();
        let rows = matrix(Some("grafana"), &features).unwrap();
        assert!(rows[0].1.supports_resource_permissions());
    }

    #[test]
    fn test_unknown_flavor() {
        assert!(matrix(Some("loki"), &FeatureFlags::default()).is_err());
    }

    #[test]
    fn test_pad_uses_visible_width() {
        colored::control::set_override(false);
        assert_eq!(pad(&Theme::flag(true), true, 5), "yes  ");
        assert_eq!(pad(&Theme::flag(false), false, 5), "no   ");
    }
}
