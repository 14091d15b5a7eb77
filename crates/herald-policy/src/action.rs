//! Actions, their rendered state, and why an action is unavailable.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PolicyError, PolicyResult};

/// Every action the contact-points page can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactPointAction {
    /// Create a new contact point.
    AddContactPoint,
    /// Create a new notification template.
    AddTemplate,
    /// Export the whole notification configuration.
    ExportAll,
    /// Open a contact point for editing.
    Edit,
    /// Open a contact point read-only.
    View,
    /// Delete a contact point.
    Delete,
    /// Manage per-resource permissions of a contact point.
    ManagePermissions,
}

impl ContactPointAction {
    /// Whether the action belongs to the page rather than to one contact point.
    #[must_use]
    pub fn is_page_level(&self) -> bool {
        matches!(
            self,
            Self::AddContactPoint | Self::AddTemplate | Self::ExportAll
        )
    }
}

impl fmt::Display for ContactPointAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddContactPoint => write!(f, "add contact point"),
            Self::AddTemplate => write!(f, "add notification template"),
            Self::ExportAll => write!(f, "export all"),
            Self::Edit => write!(f, "edit"),
            Self::View => write!(f, "view"),
            Self::Delete => write!(f, "delete"),
            Self::ManagePermissions => write!(f, "manage permissions"),
        }
    }
}

/// Why an action is hidden or disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum Denial {
    /// The Alertmanager flavor does not support the action.
    Unsupported,
    /// The license does not include the required feature.
    Unlicensed,
    /// The caller lacks the scoped grant.
    PermissionDenied,
    /// The contact point is provisioned.
    Provisioned,
    /// User-authored notification policies still route here.
    InUse {
        /// Number of user-authored policies.
        policies: usize,
    },
    /// The surrounding view has locked entity actions.
    Locked,
    /// The contact point opens through the edit action instead.
    Editable,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "not supported by this alertmanager"),
            Self::Unlicensed => write!(f, "not included in the license"),
            Self::PermissionDenied => write!(f, "insufficient permissions"),
            Self::Provisioned => write!(f, "contact point is provisioned"),
            Self::InUse { policies: 1 } => write!(f, "used by 1 notification policy"),
            Self::InUse { policies } => write!(f, "used by {policies} notification policies"),
            Self::Locked => write!(f, "actions are locked"),
            Self::Editable => write!(f, "contact point opens for editing"),
        }
    }
}

/// How an action is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum ActionState {
    /// Not rendered at all.
    Hidden {
        /// Why it is hidden.
        #[serde(flatten)]
        denial: Denial,
    },
    /// Rendered but not clickable.
    Disabled {
        /// Why it is disabled.
        #[serde(flatten)]
        denial: Denial,
    },
    /// Rendered and clickable.
    Enabled,
}

impl ActionState {
    /// Hidden for the given reason.
    #[must_use]
    pub fn hidden(denial: Denial) -> Self {
        Self::Hidden { denial }
    }

    /// Disabled for the given reason.
    #[must_use]
    pub fn disabled(denial: Denial) -> Self {
        Self::Disabled { denial }
    }

    /// Whether the action is rendered.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden { .. })
    }

    /// Whether the action can be triggered.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled)
    }

    /// Whether the action is rendered but not clickable.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled { .. })
    }

    /// Why the action is unavailable, if it is.
    #[must_use]
    pub fn denial(&self) -> Option<Denial> {
        match self {
            Self::Hidden { denial } | Self::Disabled { denial } => Some(*denial),
            Self::Enabled => None,
        }
    }

    /// Turn the state into a go/no-go for attempting `action`.
    ///
    /// # Errors
    ///
    /// - [`PolicyError::CapabilityDenied`] for unsupported or unlicensed actions
    /// - [`PolicyError::PermissionDenied`] when the scoped grant is missing
    /// - [`PolicyError::StateConflict`] when the entity's state forbids it
    pub fn check(&self, action: ContactPointAction) -> PolicyResult<()> {
        match self.denial() {
            None => Ok(()),
            Some(denial @ (Denial::Unsupported | Denial::Unlicensed)) => {
                Err(PolicyError::CapabilityDenied {
                    action,
                    reason: denial,
                })
            },
            Some(Denial::PermissionDenied) => Err(PolicyError::PermissionDenied { action }),
            Some(
                denial @ (Denial::Provisioned
                | Denial::InUse { .. }
                | Denial::Locked
                | Denial::Editable),
            ) => Err(PolicyError::StateConflict {
                action,
                reason: denial,
            }),
        }
    }
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden { denial } => write!(f, "hidden ({denial})"),
            Self::Disabled { denial } => write!(f, "disabled ({denial})"),
            Self::Enabled => write!(f, "enabled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_predicates() {
        let hidden = ActionState::hidden(Denial::Unsupported);
        assert!(!hidden.is_visible());
        assert!(!hidden.is_enabled());

        let disabled = ActionState::disabled(Denial::Provisioned);
        assert!(disabled.is_visible());
        assert!(disabled.is_disabled());
        assert!(!disabled.is_enabled());

        assert!(ActionState::Enabled.is_visible());
        assert!(ActionState::Enabled.is_enabled());
        assert_eq!(ActionState::Enabled.denial(), None);
    }

    #[test]
    fn test_check_maps_denials_to_errors() {
        assert!(ActionState::Enabled.check(ContactPointAction::Delete).is_ok());

        assert!(matches!(
            ActionState::hidden(Denial::Unsupported).check(ContactPointAction::AddContactPoint),
            Err(PolicyError::CapabilityDenied { .. })
        ));
        assert!(matches!(
            ActionState::hidden(Denial::Unlicensed).check(ContactPointAction::ManagePermissions),
            Err(PolicyError::CapabilityDenied { .. })
        ));
        assert!(matches!(
            ActionState::disabled(Denial::PermissionDenied).check(ContactPointAction::Delete),
            Err(PolicyError::PermissionDenied { .. })
        ));
        assert!(matches!(
            ActionState::disabled(Denial::InUse { policies: 2 }).check(ContactPointAction::Delete),
            Err(PolicyError::StateConflict {
                reason: Denial::InUse { policies: 2 },
                ..
            })
        ));
    }

    #[test]
    fn test_editable_view_is_a_state_conflict() {
        assert_eq!(
            ActionState::hidden(Denial::Editable).check(ContactPointAction::View),
            Err(PolicyError::StateConflict {
                action: ContactPointAction::View,
                reason: Denial::Editable,
            })
        );
    }

    #[test]
    fn test_denial_display_pluralises() {
        assert_eq!(
            Denial::InUse { policies: 1 }.to_string(),
            "used by 1 notification policy"
        );
        assert_eq!(
            Denial::InUse { policies: 3 }.to_string(),
            "used by 3 notification policies"
        );
    }

    #[test]
    fn test_state_serializes_with_reason() {
        let json = serde_json::to_value(ActionState::disabled(Denial::InUse { policies: 1 })).unwrap();
        assert_eq!(json["state"], "disabled");
        assert_eq!(json["reason"], "in_use");
        assert_eq!(json["policies"], 1);

        let json = serde_json::to_value(ActionState::Enabled).unwrap();
        assert_eq!(json, serde_json::json!({"state": "enabled"}));
    }

    #[test]
    fn test_page_level_actions() {
        assert!(ContactPointAction::ExportAll.is_page_level());
        assert!(ContactPointAction::AddTemplate.is_page_level());
        assert!(!ContactPointAction::Delete.is_page_level());
    }
}
