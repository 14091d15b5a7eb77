//! Evaluate command - derive the contact-points page for a listing.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use herald_config::Config;
use herald_core::AlertmanagerSource;
use herald_policy::{
    ActionState, ContactPointAction, ContactPointActions, ContactPointCatalog, ContactPointRow,
    ContactPointsTab, ContactPointsView, LoadState, ViewQuery, ViewState, listing,
};
use herald_telemetry::{RequestContext, RequestGuard};

use super::{OutputFormat, print_json, read_contact_points};
use crate::config_bridge::{self, PolicyOverrides};
use crate::theme::Theme;

/// Load a listing file, keeping a failure as the load outcome.
pub(crate) fn load_listing(path: &Path) -> LoadState<ContactPointCatalog> {
    LoadState::from(read_contact_points(path).map_err(|e| format!("{e:#}")))
        .map(ContactPointCatalog::new)
}

/// Evaluate a listing and print the derived page.
pub(crate) fn run_evaluate(
    cfg: &Config,
    overrides: &PolicyOverrides,
    path: &Path,
    query: &ViewQuery,
    format: OutputFormat,
) -> Result<()> {
    let (source, policy) = config_bridge::to_policy(cfg, overrides)?;

    let guard = RequestGuard::new(
        RequestContext::new("evaluate")
            .with_alertmanager(source.name())
            .with_operation("render")
            .with_metadata("listing", path.display().to_string()),
    );
    let state = listing::render(&load_listing(path), &policy, query);
    drop(guard);

    match format {
        OutputFormat::Json => print_json(&state)?,
        OutputFormat::Pretty => print!("{}", render_pretty(&state, &source, query)),
    }

    if let ViewState::Error(message) = state {
        anyhow::bail!("contact points could not be loaded: {message}");
    }
    Ok(())
}

/// Human-readable page.
pub(crate) fn render_pretty(state: &ViewState, source: &AlertmanagerSource, query: &ViewQuery) -> String {
    let mut lines = vec![
        String::new(),
        Theme::header(&format!("Contact points on {source}")),
        Theme::separator(),
    ];

    match state {
        ViewState::Loading => lines.push(Theme::info("Loading contact points...")),
        ViewState::Error(message) => lines.push(Theme::error(message)),
        ViewState::Ready(view) => render_view(&mut lines, view, query),
    }

    lines.push(String::new());
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_view(lines: &mut Vec<String>, view: &ContactPointsView, query: &ViewQuery) {
    lines.push(Theme::kv("Tab", view.tab.as_query()));
    lines.push(String::new());
    lines.push(Theme::header("Page actions"));

    let page_actions: &[ContactPointAction] = match view.tab {
        ContactPointsTab::ContactPoints => {
            &[ContactPointAction::AddContactPoint, ContactPointAction::ExportAll]
        },
        ContactPointsTab::Templates => &[ContactPointAction::AddTemplate],
    };
    for action in page_actions {
        if let Some(state) = view.page.get(*action) {
            lines.push(format!("  {:<24} {}", action.to_string(), Theme::action_state(&state)));
        }
    }
    lines.push(String::new());

    if view.tab == ContactPointsTab::Templates {
        lines.push(Theme::info("Notification templates are not listed"));
        return;
    }

    if view.rows.is_empty() {
        let message = if query.search.trim().is_empty() {
            "No contact points".to_string()
        } else {
            format!("No contact points match '{}'", query.search.trim())
        };
        lines.push(Theme::warning(&message));
        return;
    }

    lines.push(Theme::header(&format!(
        "{} contact points, {} unused",
        view.rows.len(),
        view.unused_count()
    )));
    for row in &view.rows {
        render_row(lines, row);
    }
}

fn render_row(lines: &mut Vec<String>, row: &ContactPointRow) {
    let mut title = format!("  {}", row.name.bold());
    if row.provisioned {
        title.push_str(&format!(" {}", "[provisioned]".magenta()));
    }
    if !row.in_use {
        title.push_str(&format!(" {}", "[unused]".yellow()));
    }
    lines.push(title);

    let integrations = if row.integrations.is_empty() {
        "none".to_string()
    } else {
        row.integrations.join(", ")
    };
    lines.push(format!("    {}", Theme::kv("integrations", &integrations)));
    if let Some(summary) = &row.policy_summary {
        lines.push(format!("    {}", Theme::kv("policies", summary)));
    }
    lines.push(format!(
        "    {}",
        Theme::kv("primary", &Theme::primary(row.actions.primary()))
    ));
    for (action, state) in row_actions(&row.actions) {
        lines.push(format!(
            "    {}",
            Theme::dimmed(&format!("{action:<20}")) + &Theme::action_state(&state)
        ));
    }
}

fn row_actions(actions: &ContactPointActions) -> [(ContactPointAction, ActionState); 4] {
    [
        (ContactPointAction::Edit, actions.edit),
        (ContactPointAction::View, actions.view),
        (ContactPointAction::Delete, actions.delete),
        (ContactPointAction::ManagePermissions, actions.manage_permissions),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_policy::ContactPointActionPolicy;
    use std::io::Write;

    fn listing_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", herald_test::grafana_listing_json()).unwrap();
        file
    }

    fn editor_policy() -> ContactPointActionPolicy {
        ContactPointActionPolicy::for_source(
            &AlertmanagerSource::grafana(),
            &herald_core::FeatureFlags::default(),
            herald_test::read_write_internal(),
            herald_core::LicenseFeatures::none(),
        )
    }

    #[test]
    fn test_load_listing() {
        let file = listing_file();
        let loaded = load_listing(file.path());
        assert_eq!(loaded.loaded().map(ContactPointCatalog::len), Some(3));
    }

    #[test]
    fn test_missing_listing_is_a_failed_load() {
        let loaded = load_listing(Path::new("/nonexistent/listing.json"));
        match loaded {
            LoadState::Failed(message) => assert!(message.contains("failed to read")),
            other => panic!("expected failed load, got {other:?}"),
        }
    }

    #[test]
    fn test_render_pretty_ready() {
        colored::control::set_override(false);
        let file = listing_file();
        let state = listing::render(&load_listing(file.path()), &editor_policy(), &ViewQuery::default());
        let out = render_pretty(&state, &AlertmanagerSource::grafana(), &ViewQuery::default());

        assert!(out.contains("Contact points on grafana (grafana)"));
        assert!(out.contains("add contact point"));
        assert!(out.contains("3 contact points, 1 unused"));
        assert!(out.contains("provisioned-contact-point [provisioned] [unused]"));
        assert!(out.contains("policies: 1 notification policy"));
        assert!(out.contains("disabled (used by 1 notification policy)"));
        assert!(out.contains("hidden (contact point opens for editing)"));
        assert!(!out.contains("add notification template"));
    }

    #[test]
    fn test_render_pretty_search_without_match() {
        colored::control::set_override(false);
        let file = listing_file();
        let query = ViewQuery::default().with_search("pagerduty");
        let state = listing::render(&load_listing(file.path()), &editor_policy(), &query);
        let out = render_pretty(&state, &AlertmanagerSource::grafana(), &query);
        assert!(out.contains("No contact points match 'pagerduty'"));
    }

    #[test]
    fn test_render_pretty_templates_tab() {
        colored::control::set_override(false);
        let file = listing_file();
        let query = ViewQuery::default().with_tab(ContactPointsTab::Templates);
        let state = listing::render(&load_listing(file.path()), &editor_policy(), &query);
        let out = render_pretty(&state, &AlertmanagerSource::grafana(), &query);
        assert!(out.contains("add notification template"));
        assert!(out.contains("Notification templates are not listed"));
    }

    #[test]
    fn test_render_pretty_error() {
        colored::control::set_override(false);
        let state = listing::render(
            &load_listing(Path::new("/nonexistent/listing.json")),
            &editor_policy(),
            &ViewQuery::default(),
        );
        let out = render_pretty(&state, &AlertmanagerSource::grafana(), &ViewQuery::default());
        assert!(out.contains("✗ failed to read /nonexistent/listing.json"));
    }

    #[test]
    fn test_run_evaluate_fails_on_unreadable_listing() {
        let err = run_evaluate(
            &Config::default(),
            &PolicyOverrides::default(),
            Path::new("/nonexistent/listing.json"),
            &ViewQuery::default(),
            OutputFormat::Json,
        )
        .unwrap_err();
        assert!(err.to_string().contains("could not be loaded"));
    }

    #[test]
    fn test_run_evaluate_rejects_bad_grant() {
        let file = listing_file();
        let overrides = PolicyOverrides {
            grants: vec!["admin".into()],
            ..PolicyOverrides::default()
        };
        let err = run_evaluate(
            &Config::default(),
            &overrides,
            file.path(),
            &ViewQuery::default(),
            OutputFormat::Json,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown access action"));
    }
}
