//! Herald Policy - Which contact-point actions a caller is offered.
//!
//! This crate turns a contact point, the caller's grants and the selected
//! Alertmanager's capabilities into a structured record of action states.
//! The presentation layer renders that record and makes no decisions of its
//! own.
//!
//! # Components
//!
//! - **Predicates**: [`can_add`], [`can_edit`], [`can_view`], [`can_delete`],
//!   [`can_export_all`], [`can_manage_permissions`]
//! - **Action states**: [`ActionState`] (`Hidden` / `Disabled` / `Enabled`)
//!   with a [`Denial`] reason
//! - **Policy**: [`ContactPointActionPolicy`] derives [`PageActions`] and
//!   [`ContactPointActions`] in capability, permission, entity-state order
//! - **Listing**: [`listing`] renders a fetched listing into a [`ViewState`]
//!
//! # Example
//!
//! ```
//! use herald_core::{
//!     AccessAction, AlertmanagerSource, CallerPermissions, ContactPoint, FeatureFlags,
//!     LicenseFeatures,
//! };
//! use herald_policy::{ContactPointActionPolicy, PrimaryAction};
//!
//! // A read-only caller on the Grafana-managed Alertmanager.
//! let policy = ContactPointActionPolicy::for_source(
//!     &AlertmanagerSource::grafana(),
//!     &FeatureFlags::default(),
//!     CallerPermissions::from_actions([AccessAction::NotificationsRead]),
//!     LicenseFeatures::none(),
//! );
//!
//! let page = policy.page_actions();
//! assert!(page.add_contact_point.is_disabled());
//! assert!(page.export_all.is_enabled());
//!
//! let actions = policy.contact_point_actions(&ContactPoint::new("ops", "ops"));
//! assert_eq!(actions.primary(), PrimaryAction::View);
//! assert!(actions.delete.is_disabled());
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod action;
/// Error types and results for policy checks.
pub mod error;
pub mod listing;
pub mod policy;

pub use action::{ActionState, ContactPointAction, Denial};
pub use error::{PolicyError, PolicyResult};
pub use listing::{
    ContactPointCatalog, ContactPointRow, ContactPointsTab, ContactPointsView, LoadState,
    ViewQuery, ViewState,
};
pub use policy::{
    ContactPointActionPolicy, ContactPointActions, PageActions, PrimaryAction, can_add,
    can_delete, can_edit, can_export_all, can_manage_permissions, can_view,
};
