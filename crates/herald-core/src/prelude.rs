//! Prelude module - commonly used types for convenient import.
//!
//! Use `use herald_core::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use herald_core::prelude::*;
//!
//! let contact_point = ContactPoint::new("ops-email", "ops-email-uid");
//! assert!(!contact_point.is_in_use());
//! ```

// Errors
pub use crate::{CoreError, CoreResult};

// Contact points
pub use crate::{ContactPoint, PolicyLink, PolicyType, ReceiverConfig};

// Alertmanager
pub use crate::{
    AlertmanagerCapabilities, AlertmanagerDataSource, AlertmanagerFlavor, AlertmanagerSource,
    GRAFANA_ALERTMANAGER_NAME,
};

// Permissions
pub use crate::{AccessAction, CallerPermissions, PermissionScope};

// Feature inputs
pub use crate::{ACCESS_CONTROL_FEATURE, FeatureFlags, LicenseFeatures};
