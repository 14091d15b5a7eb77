//! Contact-point action policy.
//!
//! The [`ContactPointActionPolicy`] decides, for the selected Alertmanager
//! and the current caller, which contact-point actions are rendered and
//! which of those can be triggered. It is a pure function of its inputs.
//!
//! # Check Order
//!
//! Every action is gated in three tiers, evaluated in order:
//!
//! 1. Capability: does this Alertmanager flavor (or license) offer the action? -> `Hidden`
//! 2. Permission: does the caller hold the grant scoped to this Alertmanager? -> `Disabled`
//! 3. Entity state: is the contact point provisioned, in use, or locked? -> `Disabled`
//! 4. Otherwise -> `Enabled`
//!
//! Edit is the exception to tier 2 and 3: a caller who may not edit a contact
//! point never sees the edit action; the view action is offered instead.
//! The two never show together: view is hidden while edit is rendered.

use serde::Serialize;
use tracing::{debug, warn};

use herald_core::{
    AlertmanagerCapabilities, AlertmanagerSource, CallerPermissions, ContactPoint, FeatureFlags,
    LicenseFeatures,
};

use crate::action::{ActionState, ContactPointAction, Denial};
use crate::error::PolicyResult;

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Whether a new contact point (or template) can be created.
#[must_use]
pub fn can_add(caps: &AlertmanagerCapabilities, perms: &CallerPermissions) -> bool {
    caps.supports_editing() && perms.can_write(caps.scope())
}

/// Whether `contact_point` can be edited.
///
/// Provisioned contact points are never editable, whatever the grants.
#[must_use]
pub fn can_edit(
    contact_point: &ContactPoint,
    caps: &AlertmanagerCapabilities,
    perms: &CallerPermissions,
) -> bool {
    caps.supports_editing() && perms.can_write(caps.scope()) && !contact_point.provisioned
}

/// Whether contact points can be opened read-only.
#[must_use]
pub fn can_view(caps: &AlertmanagerCapabilities, perms: &CallerPermissions) -> bool {
    perms.can_read(caps.scope())
}

/// Whether `contact_point` can be deleted.
///
/// Only user-authored policy links block deletion; auto-generated ones do not.
/// Capabilities are not consulted here: on a flavor without editing support
/// the derived delete state is hidden even when this returns `true`.
#[must_use]
pub fn can_delete(
    contact_point: &ContactPoint,
    caps: &AlertmanagerCapabilities,
    perms: &CallerPermissions,
) -> bool {
    perms.can_write(caps.scope())
        && !contact_point.provisioned
        && !contact_point.has_normal_policy_link()
}

/// Whether the full notification configuration can be exported.
#[must_use]
pub fn can_export_all(caps: &AlertmanagerCapabilities, perms: &CallerPermissions) -> bool {
    caps.supports_export() && perms.can_read(caps.scope())
}

/// Whether per-resource permissions can be managed.
#[must_use]
pub fn can_manage_permissions(
    caps: &AlertmanagerCapabilities,
    perms: &CallerPermissions,
    license: &LicenseFeatures,
) -> bool {
    license.has_access_control() && perms.can_write(caps.scope())
}

// ---------------------------------------------------------------------------
// Action records
// ---------------------------------------------------------------------------

/// Page-level actions of the contact-points page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageActions {
    /// "Add contact point".
    pub add_contact_point: ActionState,
    /// "Export all".
    pub export_all: ActionState,
    /// "Add notification template" on the templates tab.
    pub add_template: ActionState,
}

impl PageActions {
    /// State of a page-level action, `None` for per-contact-point actions.
    #[must_use]
    pub fn get(&self, action: ContactPointAction) -> Option<ActionState> {
        match action {
            ContactPointAction::AddContactPoint => Some(self.add_contact_point),
            ContactPointAction::ExportAll => Some(self.export_all),
            ContactPointAction::AddTemplate => Some(self.add_template),
            _ => None,
        }
    }
}

/// The link rendered as a contact point's primary action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryAction {
    /// The edit link (possibly disabled).
    Edit,
    /// The read-only view link.
    View,
    /// Nothing the caller can open.
    None,
}

/// Actions offered on a single contact point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContactPointActions {
    /// Open for editing.
    pub edit: ActionState,
    /// Open read-only.
    pub view: ActionState,
    /// Delete, in the "more actions" menu.
    pub delete: ActionState,
    /// Manage permissions, in the "more actions" menu.
    pub manage_permissions: ActionState,
}

impl ContactPointActions {
    /// State of a per-contact-point action, `None` for page-level actions.
    #[must_use]
    pub fn get(&self, action: ContactPointAction) -> Option<ActionState> {
        match action {
            ContactPointAction::Edit => Some(self.edit),
            ContactPointAction::View => Some(self.view),
            ContactPointAction::Delete => Some(self.delete),
            ContactPointAction::ManagePermissions => Some(self.manage_permissions),
            _ => None,
        }
    }

    /// Edit when it is rendered, otherwise view when permitted.
    #[must_use]
    pub fn primary(&self) -> PrimaryAction {
        if self.edit.is_visible() {
            PrimaryAction::Edit
        } else if self.view.is_visible() {
            PrimaryAction::View
        } else {
            PrimaryAction::None
        }
    }
}

// ---------------------------------------------------------------------------
// ContactPointActionPolicy
// ---------------------------------------------------------------------------

/// Derives action states for the selected Alertmanager and caller.
///
/// # Example
///
/// ```
/// use herald_core::{
///     AccessAction, AlertmanagerSource, CallerPermissions, ContactPoint, FeatureFlags,
///     LicenseFeatures, PolicyLink,
/// };
/// use herald_policy::ContactPointActionPolicy;
///
/// let policy = ContactPointActionPolicy::for_source(
///     &AlertmanagerSource::grafana(),
///     &FeatureFlags::default(),
///     CallerPermissions::from_actions([
///         AccessAction::NotificationsRead,
///         AccessAction::NotificationsWrite,
///     ]),
///     LicenseFeatures::none(),
/// );
///
/// let used = ContactPoint::new("ops", "ops").with_policy(PolicyLink::normal("ops"));
/// let actions = policy.contact_point_actions(&used);
/// assert!(actions.edit.is_enabled());
/// assert!(actions.delete.is_disabled());
/// ```
#[derive(Debug, Clone)]
pub struct ContactPointActionPolicy {
    capabilities: AlertmanagerCapabilities,
    permissions: CallerPermissions,
    license: LicenseFeatures,
}

impl ContactPointActionPolicy {
    /// Create a policy from already-determined capabilities.
    #[must_use]
    pub fn new(
        capabilities: AlertmanagerCapabilities,
        permissions: CallerPermissions,
        license: LicenseFeatures,
    ) -> Self {
        Self {
            capabilities,
            permissions,
            license,
        }
    }

    /// Create a policy for a selected Alertmanager under the given toggles.
    #[must_use]
    pub fn for_source(
        source: &AlertmanagerSource,
        features: &FeatureFlags,
        permissions: CallerPermissions,
        license: LicenseFeatures,
    ) -> Self {
        Self::new(
            AlertmanagerCapabilities::for_source(source, features),
            permissions,
            license,
        )
    }

    /// Capabilities this policy was built with.
    #[must_use]
    pub fn capabilities(&self) -> &AlertmanagerCapabilities {
        &self.capabilities
    }

    /// Grants this policy was built with.
    #[must_use]
    pub fn permissions(&self) -> &CallerPermissions {
        &self.permissions
    }

    fn can_write(&self) -> bool {
        self.permissions.can_write(self.capabilities.scope())
    }

    /// Derive the page-level actions.
    #[must_use]
    pub fn page_actions(&self) -> PageActions {
        let caps = &self.capabilities;
        let perms = &self.permissions;

        let add = if !caps.supports_editing() {
            ActionState::hidden(Denial::Unsupported)
        } else if can_add(caps, perms) {
            ActionState::Enabled
        } else {
            ActionState::disabled(Denial::PermissionDenied)
        };

        let export_all = if !caps.supports_export() {
            ActionState::hidden(Denial::Unsupported)
        } else if can_export_all(caps, perms) {
            ActionState::Enabled
        } else {
            ActionState::disabled(Denial::PermissionDenied)
        };

        let actions = PageActions {
            add_contact_point: add,
            export_all,
            add_template: add,
        };
        debug!(scope = %caps.scope(), ?actions, "derived page actions");
        actions
    }

    /// Derive the actions offered on one contact point.
    #[must_use]
    pub fn contact_point_actions(&self, contact_point: &ContactPoint) -> ContactPointActions {
        self.derive(contact_point, false)
    }

    /// Like [`contact_point_actions`](Self::contact_point_actions), with
    /// the mutating actions locked by the surrounding view.
    ///
    /// Locked actions stay visible but disabled; view is not locked.
    #[must_use]
    pub fn locked_contact_point_actions(&self, contact_point: &ContactPoint) -> ContactPointActions {
        self.derive(contact_point, true)
    }

    fn derive(&self, contact_point: &ContactPoint, locked: bool) -> ContactPointActions {
        let caps = &self.capabilities;
        let perms = &self.permissions;

        if contact_point.provisioned && !caps.supports_provisioning() {
            warn!(
                contact_point = %contact_point.name,
                "contact point is marked provisioned on an alertmanager without provisioning support"
            );
        }

        let edit = self.edit_state(contact_point, locked);
        let view = if edit.is_visible() {
            ActionState::hidden(Denial::Editable)
        } else if can_view(caps, perms) {
            ActionState::Enabled
        } else {
            ActionState::hidden(Denial::PermissionDenied)
        };

        let actions = ContactPointActions {
            edit,
            view,
            delete: self.delete_state(contact_point, locked),
            manage_permissions: self.manage_permissions_state(locked),
        };

        debug!(
            contact_point = %contact_point.name,
            locked,
            edit = %actions.edit,
            delete = %actions.delete,
            "derived contact point actions"
        );
        actions
    }

    fn edit_state(&self, contact_point: &ContactPoint, locked: bool) -> ActionState {
        if !self.capabilities.supports_editing() {
            return ActionState::hidden(Denial::Unsupported);
        }
        if !self.can_write() {
            return ActionState::hidden(Denial::PermissionDenied);
        }
        if contact_point.provisioned {
            return ActionState::hidden(Denial::Provisioned);
        }
        if locked {
            return ActionState::disabled(Denial::Locked);
        }
        ActionState::Enabled
    }

    fn delete_state(&self, contact_point: &ContactPoint, locked: bool) -> ActionState {
        // Deleting is part of editing the configuration.
        if !self.capabilities.supports_editing() {
            return ActionState::hidden(Denial::Unsupported);
        }
        if !self.can_write() {
            return ActionState::disabled(Denial::PermissionDenied);
        }
        if contact_point.provisioned {
            return ActionState::disabled(Denial::Provisioned);
        }
        let policies = contact_point.normal_policy_count();
        if policies > 0 {
            return ActionState::disabled(Denial::InUse { policies });
        }
        if locked {
            return ActionState::disabled(Denial::Locked);
        }
        ActionState::Enabled
    }

    fn manage_permissions_state(&self, locked: bool) -> ActionState {
        if !self.capabilities.supports_resource_permissions() {
            return ActionState::hidden(Denial::Unsupported);
        }
        if !self.license.has_access_control() {
            return ActionState::hidden(Denial::Unlicensed);
        }
        if !self.can_write() {
            return ActionState::disabled(Denial::PermissionDenied);
        }
        if locked {
            return ActionState::disabled(Denial::Locked);
        }
        ActionState::Enabled
    }

    /// State of any action; page-level actions ignore `contact_point`.
    #[must_use]
    pub fn evaluate(&self, contact_point: &ContactPoint, action: ContactPointAction) -> ActionState {
        let state = if action.is_page_level() {
            self.page_actions().get(action)
        } else {
            self.contact_point_actions(contact_point).get(action)
        };
        state.unwrap_or(ActionState::hidden(Denial::Unsupported))
    }

    /// Check whether `action` may be attempted on `contact_point`.
    ///
    /// # Errors
    ///
    /// Returns the [`PolicyError`](crate::PolicyError) matching the reason the
    /// action is hidden or disabled.
    pub fn authorize(
        &self,
        contact_point: &ContactPoint,
        action: ContactPointAction,
    ) -> PolicyResult<()> {
        self.evaluate(contact_point, action).check(action)
    }
}
