//! The contact-points page: listing, search, tabs and per-row actions.
//!
//! Fetching the listing is someone else's job. This module takes the fetch
//! outcome as a [`LoadState`] and turns it into a [`ViewState`] the
//! presentation layer renders without further decisions. A failed fetch is
//! always an error view, never an empty list.

use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

use herald_core::ContactPoint;

use crate::action::ContactPointAction;
use crate::error::{PolicyError, PolicyResult};
use crate::policy::{ContactPointActionPolicy, ContactPointActions, PageActions};

// ---------------------------------------------------------------------------
// LoadState
// ---------------------------------------------------------------------------

/// Outcome of fetching data from the Alertmanager API.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    /// Request in flight.
    Loading,
    /// Request failed with a message suitable for display.
    Failed(String),
    /// Data available.
    Loaded(T),
}

impl<T> LoadState<T> {
    /// Whether the request is still in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The loaded data, if any.
    #[must_use]
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            Self::Loading | Self::Failed(_) => None,
        }
    }

    /// Transform the loaded data.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            Self::Loading => LoadState::Loading,
            Self::Failed(message) => LoadState::Failed(message),
            Self::Loaded(data) => LoadState::Loaded(f(data)),
        }
    }
}

impl<T, E: fmt::Display> From<Result<T, E>> for LoadState<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::Loaded(data),
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// ContactPointCatalog
// ---------------------------------------------------------------------------

/// The contact points of one Alertmanager configuration, in API order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactPointCatalog {
    contact_points: Vec<ContactPoint>,
}

impl ContactPointCatalog {
    /// Wrap a fetched listing.
    ///
    /// Names are unique per configuration; later duplicates are dropped.
    #[must_use]
    pub fn new(contact_points: Vec<ContactPoint>) -> Self {
        let mut unique: Vec<ContactPoint> = Vec::with_capacity(contact_points.len());
        for cp in contact_points {
            if unique.iter().any(|existing| existing.name == cp.name) {
                warn!(contact_point = %cp.name, "duplicate contact point name in listing, ignoring");
                continue;
            }
            unique.push(cp);
        }
        Self {
            contact_points: unique,
        }
    }

    /// Number of contact points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contact_points.len()
    }

    /// Whether the configuration has no contact points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contact_points.is_empty()
    }

    /// All contact points in order.
    pub fn iter(&self) -> impl Iterator<Item = &ContactPoint> {
        self.contact_points.iter()
    }

    /// Look up a contact point by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ContactPoint> {
        self.contact_points.iter().find(|cp| cp.name == name)
    }

    /// Contact points whose name contains `query`, case-insensitively.
    ///
    /// A blank query matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&ContactPoint> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.contact_points.iter().collect();
        }
        self.contact_points
            .iter()
            .filter(|cp| cp.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Number of contact points no notification policy routes to.
    #[must_use]
    pub fn unused_count(&self) -> usize {
        self.contact_points
            .iter()
            .filter(|cp| !cp.is_in_use())
            .count()
    }

    /// Remove a contact point after a successful delete.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::NotFound`] when no contact point has that name.
    pub fn remove(&mut self, name: &str) -> PolicyResult<ContactPoint> {
        let index = self
            .contact_points
            .iter()
            .position(|cp| cp.name == name)
            .ok_or_else(|| PolicyError::NotFound {
                name: name.to_string(),
            })?;
        Ok(self.contact_points.remove(index))
    }
}

impl FromIterator<ContactPoint> for ContactPointCatalog {
    fn from_iter<I: IntoIterator<Item = ContactPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Tabs and queries
// ---------------------------------------------------------------------------

/// Tabs of the contact-points page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactPointsTab {
    /// The contact point list.
    #[default]
    ContactPoints,
    /// Notification templates.
    Templates,
}

impl ContactPointsTab {
    /// Parse the `tab` query parameter. Missing or unknown values select
    /// the contact point list.
    #[must_use]
    pub fn from_query(tab: Option<&str>) -> Self {
        match tab.map(str::trim) {
            Some("templates") => Self::Templates,
            Some("contact_points") | None => Self::ContactPoints,
            Some(other) => {
                debug!(tab = other, "unknown tab, showing contact points");
                Self::ContactPoints
            },
        }
    }

    /// The query parameter value for this tab.
    #[must_use]
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::ContactPoints => "contact_points",
            Self::Templates => "templates",
        }
    }
}

/// What the page was asked to show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    /// Selected tab.
    pub tab: ContactPointsTab,
    /// Search text typed into the contact point filter.
    pub search: String,
}

impl ViewQuery {
    /// Select a tab.
    #[must_use]
    pub fn with_tab(mut self, tab: ContactPointsTab) -> Self {
        self.tab = tab;
        self
    }

    /// Filter by name.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// One rendered contact point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactPointRow {
    /// Contact point name.
    pub name: String,
    /// API identifier.
    pub id: String,
    /// Show the "provisioned" badge.
    pub provisioned: bool,
    /// `false` shows the "unused" badge.
    pub in_use: bool,
    /// Link text to the routing policies, e.g. "1 notification policy".
    pub policy_summary: Option<String>,
    /// Integration kinds, in configuration order.
    pub integrations: Vec<String>,
    /// Actions offered on this row.
    pub actions: ContactPointActions,
}

impl ContactPointRow {
    fn build(contact_point: &ContactPoint, actions: ContactPointActions) -> Self {
        Self {
            name: contact_point.name.clone(),
            id: contact_point.id.clone(),
            provisioned: contact_point.provisioned,
            in_use: contact_point.is_in_use(),
            policy_summary: policy_summary(contact_point.normal_policy_count()),
            integrations: contact_point
                .integration_types()
                .into_iter()
                .map(str::to_string)
                .collect(),
            actions,
        }
    }
}

fn policy_summary(policies: usize) -> Option<String> {
    match policies {
        0 => None,
        1 => Some("1 notification policy".to_string()),
        n => Some(format!("{n} notification policies")),
    }
}

/// A fully-derived contact-points page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactPointsView {
    /// Selected tab.
    pub tab: ContactPointsTab,
    /// Page-level actions.
    pub page: PageActions,
    /// Contact point rows matching the search; empty on the templates tab.
    pub rows: Vec<ContactPointRow>,
}

impl ContactPointsView {
    /// Rows showing the "unused" badge.
    #[must_use]
    pub fn unused_count(&self) -> usize {
        self.rows.iter().filter(|row| !row.in_use).count()
    }

    /// Look up a row by contact point name.
    #[must_use]
    pub fn row(&self, name: &str) -> Option<&ContactPointRow> {
        self.rows.iter().find(|row| row.name == name)
    }
}

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "view")]
pub enum ViewState {
    /// Show the loading indicator.
    Loading,
    /// Show an error alert.
    Error(String),
    /// Show the page.
    Ready(ContactPointsView),
}

/// Derive the page for a fetch outcome.
#[must_use]
pub fn render(
    listing: &LoadState<ContactPointCatalog>,
    policy: &ContactPointActionPolicy,
    query: &ViewQuery,
) -> ViewState {
    let catalog = match listing {
        LoadState::Loading => return ViewState::Loading,
        LoadState::Failed(message) => {
            warn!(error = %message, "failed to load contact points");
            return ViewState::Error(message.clone());
        },
        LoadState::Loaded(catalog) => catalog,
    };

    let rows = match query.tab {
        ContactPointsTab::ContactPoints => catalog
            .search(&query.search)
            .into_iter()
            .map(|cp| ContactPointRow::build(cp, policy.contact_point_actions(cp)))
            .collect(),
        ContactPointsTab::Templates => Vec::new(),
    };

    let view = ContactPointsView {
        tab: query.tab,
        page: policy.page_actions(),
        rows,
    };
    debug!(
        tab = query.tab.as_query(),
        rows = view.rows.len(),
        total = catalog.len(),
        "rendered contact points view"
    );
    ViewState::Ready(view)
}

/// Resolve a contact point by name and check `action` on it.
///
/// Used right before an edit or delete is sent, when the listing may be
/// stale.
///
/// # Errors
///
/// Returns [`PolicyError::NotFound`] when the contact point is gone, or the
/// error for a hidden or disabled action.
pub fn authorize<'a>(
    catalog: &'a ContactPointCatalog,
    policy: &ContactPointActionPolicy,
    name: &str,
    action: ContactPointAction,
) -> PolicyResult<&'a ContactPoint> {
    let contact_point = catalog.find(name).ok_or_else(|| PolicyError::NotFound {
        name: name.to_string(),
    })?;
    policy.authorize(contact_point, action)?;
    Ok(contact_point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::{
        AccessAction, AlertmanagerSource, CallerPermissions, FeatureFlags, LicenseFeatures,
        PolicyLink,
    };

    fn policy() -> ContactPointActionPolicy {
        ContactPointActionPolicy::for_source(
            &AlertmanagerSource::grafana(),
            &FeatureFlags::default(),
            CallerPermissions::from_actions([
                AccessAction::NotificationsRead,
                AccessAction::NotificationsWrite,
            ]),
            LicenseFeatures::none(),
        )
    }

    fn catalog() -> ContactPointCatalog {
        ContactPointCatalog::new(vec![
            ContactPoint::new("grafana-default-email", "a")
                .with_policy(PolicyLink::normal("grafana-default-email")),
            ContactPoint::new("Slack with multiple channels", "b"),
            ContactPoint::new("lotsa-emails", "c"),
        ])
    }

    #[test]
    fn test_tab_from_query() {
        assert_eq!(ContactPointsTab::from_query(None), ContactPointsTab::ContactPoints);
        assert_eq!(
            ContactPointsTab::from_query(Some("templates")),
            ContactPointsTab::Templates
        );
        assert_eq!(
            ContactPointsTab::from_query(Some("foo_bar")),
            ContactPointsTab::ContactPoints
        );
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = catalog();
        let hits = catalog.search("slack");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Slack with multiple channels");

        assert_eq!(catalog.search("   ").len(), 3);
        assert!(catalog.search("pagerduty").is_empty());
    }

    #[test]
    fn test_duplicate_names_dropped() {
        let catalog = ContactPointCatalog::new(vec![
            ContactPoint::new("a", "1"),
            ContactPoint::new("a", "2"),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find("a").map(|cp| cp.id.as_str()), Some("1"));
    }

    #[test]
    fn test_render_loading_and_error() {
        let view = render(&LoadState::Loading, &policy(), &ViewQuery::default());
        assert_eq!(view, ViewState::Loading);

        let failed: LoadState<ContactPointCatalog> = LoadState::Failed("boom".to_string());
        let view = render(&failed, &policy(), &ViewQuery::default());
        assert_eq!(view, ViewState::Error("boom".to_string()));
    }

    #[test]
    fn test_render_rows_and_summary() {
        let state = LoadState::Loaded(catalog());
        let ViewState::Ready(view) = render(&state, &policy(), &ViewQuery::default()) else {
            panic!("expected ready view");
        };

        assert_eq!(view.rows.len(), 3);
        assert_eq!(view.unused_count(), 2);
        let used = view.row("grafana-default-email").unwrap();
        assert_eq!(used.policy_summary.as_deref(), Some("1 notification policy"));
        assert!(used.actions.delete.is_disabled());
    }

    #[test]
    fn test_render_templates_tab_has_no_rows() {
        let state = LoadState::Loaded(catalog());
        let query = ViewQuery::default().with_tab(ContactPointsTab::Templates);
        let ViewState::Ready(view) = render(&state, &policy(), &query) else {
            panic!("expected ready view");
        };
        assert!(view.rows.is_empty());
        assert!(view.page.add_template.is_enabled());
    }

    #[test]
    fn test_authorize_not_found() {
        let catalog = catalog();
        assert_eq!(
            authorize(&catalog, &policy(), "gone", ContactPointAction::Delete),
            Err(PolicyError::NotFound {
                name: "gone".to_string()
            })
        );
        assert!(authorize(&catalog, &policy(), "lotsa-emails", ContactPointAction::Delete).is_ok());
    }

    #[test]
    fn test_remove() {
        let mut catalog = catalog();
        let removed = catalog.remove("lotsa-emails").unwrap();
        assert_eq!(removed.id, "c");
        assert!(catalog.find("lotsa-emails").is_none());
        assert!(matches!(
            catalog.remove("lotsa-emails"),
            Err(PolicyError::NotFound { .. })
        ));
    }

    #[test]
    fn test_load_state_from_result() {
        let ok: LoadState<u8> = Ok::<_, String>(1).into();
        assert_eq!(ok.loaded(), Some(&1));

        let err: LoadState<u8> = Err::<u8, _>("nope").into();
        assert_eq!(err, LoadState::Failed("nope".to_string()));
        assert!(LoadState::<u8>::Loading.is_loading());
    }
}
