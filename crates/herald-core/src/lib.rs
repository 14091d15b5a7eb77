//! Herald Core - Foundation types for contact-point management.
//!
//! This crate provides:
//! - The contact point data model and its policy linkage
//! - Alertmanager flavors and the capabilities each one exposes
//! - Caller permissions, scoped to internal or external Alertmanagers
//! - Feature toggles and license features passed in explicitly
//!
//! Nothing here reads ambient state. Every input the action policy consumes
//! is constructed by the caller and handed over as a plain value.
//!
//! # Example
//!
//! ```
//! use herald_core::{
//!     AccessAction, AlertmanagerCapabilities, AlertmanagerFlavor, CallerPermissions, FeatureFlags,
//! };
//!
//! let caps = AlertmanagerCapabilities::for_flavor(AlertmanagerFlavor::Mimir, &FeatureFlags::default());
//! assert!(caps.supports_editing());
//! assert!(!caps.supports_export());
//!
//! let perms = CallerPermissions::from_actions([AccessAction::NotificationsExternalWrite]);
//! assert!(perms.can_write(caps.scope()));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod alertmanager;
pub mod contact_point;
pub mod error;
pub mod features;
pub mod permissions;

pub use alertmanager::{
    AlertmanagerCapabilities, AlertmanagerDataSource, AlertmanagerFlavor, AlertmanagerSource,
    GRAFANA_ALERTMANAGER_NAME,
};
pub use contact_point::{ContactPoint, PolicyLink, PolicyType, ReceiverConfig};
pub use error::{CoreError, CoreResult};
pub use features::{ACCESS_CONTROL_FEATURE, FeatureFlags, LicenseFeatures};
pub use permissions::{AccessAction, CallerPermissions, PermissionScope};
