use super::path::{get_nested, set_nested};
use super::*;

fn parse(s: &str) -> toml::Value {
    toml::from_str(s).unwrap()
}

#[test]
fn test_deep_merge_scalars() {
    let mut base = parse(
        r#"
        [alertmanager]
        name = "grafana"
        flavor = "grafana"
    "#,
    );
    let overlay = parse(
        r#"
        [alertmanager]
        name = "mimir-ds"
    "#,
    );

    deep_merge(&mut base, &overlay);

    assert_eq!(base["alertmanager"]["name"].as_str(), Some("mimir-ds"));
    assert_eq!(base["alertmanager"]["flavor"].as_str(), Some("grafana"));
}

#[test]
fn test_deep_merge_arrays_replace() {
    let mut base = parse(r#"permissions = { grants = ["a", "b"] }"#);
    let overlay = parse(r#"permissions = { grants = ["c"] }"#);

    deep_merge(&mut base, &overlay);

    let grants = base["permissions"]["grants"].as_array().unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].as_str(), Some("c"));
}

#[test]
fn test_deep_merge_tracking() {
    let mut base = parse(
        r#"
        [logging]
        level = "info"
        format = "compact"
    "#,
    );
    let overlay = parse(
        r#"
        [logging]
        level = "debug"

        [license]
        features = ["accesscontrol"]
    "#,
    );

    let mut sources = FieldSources::new();
    deep_merge_tracking(&mut base, &overlay, "", &ConfigLayer::User, &mut sources);

    assert_eq!(sources.get("logging.level"), Some(&ConfigLayer::User));
    assert_eq!(sources.get("license.features"), Some(&ConfigLayer::User));
    assert!(!sources.contains_key("logging.format"));
}

#[test]
fn test_set_nested() {
    let mut val = parse("[features]\nalerting_api_server = true");
    set_nested(
        &mut val,
        &["features", "alerting_api_server"],
        toml::Value::Boolean(false),
    );
    assert_eq!(
        get_nested(&val, &["features", "alerting_api_server"]).and_then(toml::Value::as_bool),
        Some(false)
    );

    // Missing intermediate table is skipped.
    set_nested(&mut val, &["nope", "x"], toml::Value::Integer(1));
    assert!(get_nested(&val, &["nope"]).is_none());
}

#[test]
fn test_workspace_cannot_add_grants() {
    let baseline = parse(r#"permissions = { grants = ["alerting.notifications:read"] }"#);
    let workspace = parse(
        r#"permissions = { grants = ["alerting.notifications:read", "alerting.notifications:write"] }"#,
    );

    let mut merged = baseline.clone();
    deep_merge(&mut merged, &workspace);
    let reverted = enforce_restrictions(&mut merged, &baseline, &workspace);
    assert_eq!(reverted, vec!["permissions.grants"]);

    let grants = merged["permissions"]["grants"].as_array().unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].as_str(), Some("alerting.notifications:read"));
}

#[test]
fn test_workspace_can_drop_grants() {
    let baseline = parse(
        r#"permissions = { grants = ["alerting.notifications:read", "alerting.notifications:write"] }"#,
    );
    let workspace = parse(r#"permissions = { grants = ["alerting.notifications:read"] }"#);

    let mut merged = baseline.clone();
    deep_merge(&mut merged, &workspace);
    assert!(enforce_restrictions(&mut merged, &baseline, &workspace).is_empty());

    assert_eq!(merged["permissions"]["grants"].as_array().unwrap().len(), 1);
}

#[test]
fn test_workspace_cannot_add_license_features() {
    let baseline = parse("license = { features = [] }");
    let workspace = parse(r#"license = { features = ["accesscontrol"] }"#);

    let mut merged = baseline.clone();
    deep_merge(&mut merged, &workspace);
    let reverted = enforce_restrictions(&mut merged, &baseline, &workspace);
    assert_eq!(reverted, vec!["license.features"]);

    assert!(merged["license"]["features"].as_array().unwrap().is_empty());
}

#[test]
fn test_workspace_cannot_enable_api_server() {
    let baseline = parse("features = { alerting_api_server = false }");
    let workspace = parse("features = { alerting_api_server = true }");

    let mut merged = baseline.clone();
    deep_merge(&mut merged, &workspace);
    let reverted = enforce_restrictions(&mut merged, &baseline, &workspace);
    assert_eq!(reverted, vec!["features.alerting_api_server"]);

    assert_eq!(
        merged["features"]["alerting_api_server"].as_bool(),
        Some(false)
    );

    // Turning it off is allowed.
    let baseline = parse("features = { alerting_api_server = true }");
    let workspace = parse("features = { alerting_api_server = false }");
    let mut merged = baseline.clone();
    deep_merge(&mut merged, &workspace);
    assert!(enforce_restrictions(&mut merged, &baseline, &workspace).is_empty());
    assert_eq!(
        merged["features"]["alerting_api_server"].as_bool(),
        Some(false)
    );
}
