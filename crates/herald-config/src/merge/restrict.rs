use tracing::warn;

use super::path::{get_nested, set_nested};

/// Enforce that the workspace layer can only **narrow** what the caller is
/// granted, never widen it. Call this after merging the workspace layer but
/// before final deserialization.
///
/// `baseline` is the merged config *before* the workspace layer was applied,
/// so enforcement works even when no user config file exists.
///
/// Returns the dotted paths of the fields that were reverted.
pub fn enforce_restrictions(
    merged: &mut toml::Value,
    baseline: &toml::Value,
    workspace_layer: &toml::Value,
) -> Vec<&'static str> {
    let mut reverted = Vec::new();

    // Grants and license features: workspace can only drop entries.
    if block_workspace_expansion(
        merged,
        baseline,
        workspace_layer,
        &["permissions", "grants"],
        "permissions.grants",
    ) {
        reverted.push("permissions.grants");
    }
    if block_workspace_expansion(
        merged,
        baseline,
        workspace_layer,
        &["license", "features"],
        "license.features",
    ) {
        reverted.push("license.features");
    }

    // Toggles: workspace cannot switch on what the baseline left off.
    if enforce_bool_no_enable(
        merged,
        baseline,
        workspace_layer,
        &["features", "alerting_api_server"],
        "features.alerting_api_server",
    ) {
        reverted.push("features.alerting_api_server");
    }

    reverted
}

/// Block workspace from expanding an array beyond what the baseline allows.
/// If the workspace adds any entry missing from the baseline, the baseline
/// array is restored.
fn block_workspace_expansion(
    merged: &mut toml::Value,
    baseline: &toml::Value,
    workspace: &toml::Value,
    path: &[&str],
    field_name: &str,
) -> bool {
    let Some(ws_items) = get_nested(workspace, path).and_then(toml::Value::as_array) else {
        return false;
    };

    let baseline_items = get_nested(baseline, path)
        .and_then(|v| v.as_array().cloned())
        .unwrap_or_default();

    if ws_items.iter().any(|item| !baseline_items.contains(item)) {
        warn!(
            "Workspace config tried to expand {field_name} beyond baseline; \
             reverting to baseline"
        );
        set_nested(merged, path, toml::Value::Array(baseline_items));
        return true;
    }
    false
}

/// Keep a boolean `false` when the workspace tries to turn it on and the
/// baseline has it off.
fn enforce_bool_no_enable(
    merged: &mut toml::Value,
    baseline: &toml::Value,
    workspace: &toml::Value,
    path: &[&str],
    field_name: &str,
) -> bool {
    let base_val = get_nested(baseline, path)
        .and_then(toml::Value::as_bool)
        .unwrap_or(false);
    let ws_val = get_nested(workspace, path).and_then(toml::Value::as_bool);

    if ws_val == Some(true) && !base_val {
        warn!("Workspace config tried to enable {field_name}; forcing to false");
        set_nested(merged, path, toml::Value::Boolean(false));
        return true;
    }
    false
}
