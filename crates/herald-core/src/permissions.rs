//! Caller permissions for notification resources.
//!
//! Grants come from an access-control lookup keyed by action identifiers
//! such as `alerting.notifications:read`. Internal (Grafana-managed) and
//! external Alertmanagers use disjoint grant families: holding
//! `alerting.notifications.external:write` says nothing about the internal
//! Alertmanager, and the reverse holds as well.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Which family of grants applies to an Alertmanager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionScope {
    /// The Grafana-managed Alertmanager.
    Internal,
    /// Any data-source backed Alertmanager (Mimir, Prometheus).
    External,
}

impl fmt::Display for PermissionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal => write!(f, "internal"),
            Self::External => write!(f, "external"),
        }
    }
}

/// Access-control action identifiers relevant to contact points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AccessAction {
    /// `alerting.notifications:read`
    NotificationsRead,
    /// `alerting.notifications:write`
    NotificationsWrite,
    /// `alerting.notifications.external:read`
    NotificationsExternalRead,
    /// `alerting.notifications.external:write`
    NotificationsExternalWrite,
}

impl AccessAction {
    /// All known actions.
    pub const ALL: [Self; 4] = [
        Self::NotificationsRead,
        Self::NotificationsWrite,
        Self::NotificationsExternalRead,
        Self::NotificationsExternalWrite,
    ];

    /// The identifier used by the access-control service.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotificationsRead => "alerting.notifications:read",
            Self::NotificationsWrite => "alerting.notifications:write",
            Self::NotificationsExternalRead => "alerting.notifications.external:read",
            Self::NotificationsExternalWrite => "alerting.notifications.external:write",
        }
    }

    /// The read action for a scope.
    #[must_use]
    pub fn read(scope: PermissionScope) -> Self {
        match scope {
            PermissionScope::Internal => Self::NotificationsRead,
            PermissionScope::External => Self::NotificationsExternalRead,
        }
    }

    /// The write action for a scope.
    #[must_use]
    pub fn write(scope: PermissionScope) -> Self {
        match scope {
            PermissionScope::Internal => Self::NotificationsWrite,
            PermissionScope::External => Self::NotificationsExternalWrite,
        }
    }
}

impl fmt::Display for AccessAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s.trim())
            .ok_or_else(|| CoreError::UnknownAccessAction(s.to_string()))
    }
}

impl TryFrom<String> for AccessAction {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccessAction> for String {
    fn from(action: AccessAction) -> Self {
        action.as_str().to_string()
    }
}

/// The set of actions granted to the current caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerPermissions {
    grants: HashSet<AccessAction>,
}

impl CallerPermissions {
    /// No grants at all.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Build from an iterator of granted actions.
    #[must_use]
    pub fn from_actions(actions: impl IntoIterator<Item = AccessAction>) -> Self {
        Self {
            grants: actions.into_iter().collect(),
        }
    }

    /// Parse grant identifiers, rejecting unknown ones.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownAccessAction`] for the first identifier
    /// that is not a known action.
    pub fn parse<I, S>(identifiers: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let grants = identifiers
            .into_iter()
            .map(|id| id.as_ref().parse::<AccessAction>())
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(Self { grants })
    }

    /// Add a grant.
    #[must_use]
    pub fn with(mut self, action: AccessAction) -> Self {
        self.grants.insert(action);
        self
    }

    /// Whether a specific action is granted.
    #[must_use]
    pub fn has(&self, action: AccessAction) -> bool {
        self.grants.contains(&action)
    }

    /// Whether read is granted for the given scope.
    #[must_use]
    pub fn can_read(&self, scope: PermissionScope) -> bool {
        self.has(AccessAction::read(scope))
    }

    /// Whether write is granted for the given scope.
    ///
    /// Write does not imply read.
    #[must_use]
    pub fn can_write(&self, scope: PermissionScope) -> bool {
        self.has(AccessAction::write(scope))
    }

    /// Granted actions, sorted by identifier.
    #[must_use]
    pub fn actions(&self) -> Vec<AccessAction> {
        let mut actions: Vec<AccessAction> = self.grants.iter().copied().collect();
        actions.sort_by_key(AccessAction::as_str);
        actions
    }

    /// Whether nothing is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}
