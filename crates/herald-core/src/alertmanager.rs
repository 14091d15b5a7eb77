//! Alertmanager flavors and the capabilities each one exposes.
//!
//! # Capability Matrix
//!
//! | Flavor       | editing | provisioning | export | resource permissions           |
//! |--------------|---------|--------------|--------|--------------------------------|
//! | `Grafana`    | yes     | yes          | yes    | with the alerting API server   |
//! | `Mimir`      | yes     | no           | no     | no                             |
//! | `Prometheus` | no      | no           | no     | no                             |
//!
//! Capabilities are determined once per selected Alertmanager and are not
//! mutated afterwards; [`AlertmanagerCapabilities`] exposes read-only
//! accessors only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::features::FeatureFlags;
use crate::permissions::PermissionScope;

/// Reserved source name of the Grafana-managed Alertmanager.
pub const GRAFANA_ALERTMANAGER_NAME: &str = "grafana";

// ---------------------------------------------------------------------------
// AlertmanagerFlavor
// ---------------------------------------------------------------------------

/// Implementation variant of an Alertmanager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertmanagerFlavor {
    /// The Alertmanager embedded in Grafana.
    Grafana,
    /// Mimir (or Cortex) Alertmanager with a configuration API.
    Mimir,
    /// Vanilla Prometheus Alertmanager, read-only configuration.
    Prometheus,
}

impl AlertmanagerFlavor {
    /// All flavors.
    pub const ALL: [Self; 3] = [Self::Grafana, Self::Mimir, Self::Prometheus];

    /// Which grant family authorizes actions against this flavor.
    #[must_use]
    pub fn scope(self) -> PermissionScope {
        match self {
            Self::Grafana => PermissionScope::Internal,
            Self::Mimir | Self::Prometheus => PermissionScope::External,
        }
    }
}

impl fmt::Display for AlertmanagerFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grafana => write!(f, "grafana"),
            Self::Mimir => write!(f, "mimir"),
            Self::Prometheus => write!(f, "prometheus"),
        }
    }
}

impl FromStr for AlertmanagerFlavor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grafana" => Ok(Self::Grafana),
            "mimir" | "cortex" => Ok(Self::Mimir),
            "prometheus" | "vanilla" => Ok(Self::Prometheus),
            _ => Err(CoreError::UnknownFlavor(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// AlertmanagerCapabilities
// ---------------------------------------------------------------------------

/// What the selected Alertmanager supports, independent of who is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct AlertmanagerCapabilities {
    scope: PermissionScope,
    supports_editing: bool,
    supports_provisioning: bool,
    supports_export: bool,
    supports_resource_permissions: bool,
}

impl AlertmanagerCapabilities {
    /// Capabilities of a flavor under the given feature toggles.
    #[must_use]
    pub fn for_flavor(flavor: AlertmanagerFlavor, features: &FeatureFlags) -> Self {
        match flavor {
            AlertmanagerFlavor::Grafana => Self {
                scope: PermissionScope::Internal,
                supports_editing: true,
                supports_provisioning: true,
                supports_export: true,
                supports_resource_permissions: features.alerting_api_server,
            },
            AlertmanagerFlavor::Mimir => Self {
                scope: PermissionScope::External,
                supports_editing: true,
                supports_provisioning: false,
                supports_export: false,
                supports_resource_permissions: false,
            },
            AlertmanagerFlavor::Prometheus => Self {
                scope: PermissionScope::External,
                supports_editing: false,
                supports_provisioning: false,
                supports_export: false,
                supports_resource_permissions: false,
            },
        }
    }

    /// Capabilities of a concrete Alertmanager source.
    #[must_use]
    pub fn for_source(source: &AlertmanagerSource, features: &FeatureFlags) -> Self {
        Self::for_flavor(source.flavor(), features)
    }

    /// No capabilities at all for the given scope.
    ///
    /// Combine with the `with_*` constructors to describe an Alertmanager
    /// outside the known flavor matrix.
    #[must_use]
    pub fn none(scope: PermissionScope) -> Self {
        Self {
            scope,
            supports_editing: false,
            supports_provisioning: false,
            supports_export: false,
            supports_resource_permissions: false,
        }
    }

    /// Copy with editing support.
    #[must_use]
    pub fn with_editing(mut self) -> Self {
        self.supports_editing = true;
        self
    }

    /// Copy with provisioning support.
    #[must_use]
    pub fn with_provisioning(mut self) -> Self {
        self.supports_provisioning = true;
        self
    }

    /// Copy with export support.
    #[must_use]
    pub fn with_export(mut self) -> Self {
        self.supports_export = true;
        self
    }

    /// Copy with resource-permission support.
    #[must_use]
    pub fn with_resource_permissions(mut self) -> Self {
        self.supports_resource_permissions = true;
        self
    }

    /// Grant family that must authorize actions here.
    #[must_use]
    pub fn scope(&self) -> PermissionScope {
        self.scope
    }

    /// Contact points can be created, edited and deleted.
    #[must_use]
    pub fn supports_editing(&self) -> bool {
        self.supports_editing
    }

    /// Contact points may be provisioned from configuration-as-code.
    #[must_use]
    pub fn supports_provisioning(&self) -> bool {
        self.supports_provisioning
    }

    /// The configuration can be exported.
    #[must_use]
    pub fn supports_export(&self) -> bool {
        self.supports_export
    }

    /// Contact points carry per-resource permissions.
    #[must_use]
    pub fn supports_resource_permissions(&self) -> bool {
        self.supports_resource_permissions
    }
}

// ---------------------------------------------------------------------------
// AlertmanagerSource
// ---------------------------------------------------------------------------

/// The Alertmanager currently selected on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertmanagerSource {
    name: String,
    flavor: AlertmanagerFlavor,
}

impl AlertmanagerSource {
    /// The Grafana-managed Alertmanager.
    #[must_use]
    pub fn grafana() -> Self {
        Self {
            name: GRAFANA_ALERTMANAGER_NAME.to_string(),
            flavor: AlertmanagerFlavor::Grafana,
        }
    }

    /// A named Alertmanager of the given flavor.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::FlavorMismatch`] when the reserved `grafana`
    /// name is paired with an external flavor, or an external name with the
    /// `Grafana` flavor.
    pub fn new(name: impl Into<String>, flavor: AlertmanagerFlavor) -> CoreResult<Self> {
        let name = name.into();
        let reserved = name == GRAFANA_ALERTMANAGER_NAME;
        if reserved != (flavor == AlertmanagerFlavor::Grafana) {
            return Err(CoreError::FlavorMismatch {
                name,
                flavor: flavor.to_string(),
            });
        }
        Ok(Self { name, flavor })
    }

    /// Source name (data source UID for external Alertmanagers).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Implementation flavor.
    #[must_use]
    pub fn flavor(&self) -> AlertmanagerFlavor {
        self.flavor
    }

    /// Whether this is the Grafana-managed Alertmanager.
    #[must_use]
    pub fn is_grafana_managed(&self) -> bool {
        self.flavor == AlertmanagerFlavor::Grafana
    }
}

impl fmt::Display for AlertmanagerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.flavor)
    }
}

// ---------------------------------------------------------------------------
// AlertmanagerDataSource
// ---------------------------------------------------------------------------

/// Declared settings of an Alertmanager data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertmanagerDataSource {
    /// Data source UID.
    pub uid: String,
    /// Declared implementation (`mimir`, `cortex`, `prometheus`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,
    /// Whether Grafana-managed alerts are forwarded to this Alertmanager.
    #[serde(default, alias = "handleGrafanaManagedAlerts")]
    pub handle_grafana_managed_alerts: bool,
}

impl AlertmanagerDataSource {
    /// Flavor implied by the declared implementation.
    ///
    /// Data sources that declare no implementation are Mimir.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownFlavor`] for an unrecognised
    /// implementation, and [`CoreError::FlavorMismatch`] when a data source
    /// claims to be the Grafana-managed Alertmanager.
    pub fn flavor(&self) -> CoreResult<AlertmanagerFlavor> {
        let flavor = match self.implementation.as_deref() {
            None => AlertmanagerFlavor::Mimir,
            Some(declared) => declared.parse()?,
        };
        if flavor == AlertmanagerFlavor::Grafana {
            return Err(CoreError::FlavorMismatch {
                name: self.uid.clone(),
                flavor: flavor.to_string(),
            });
        }
        Ok(flavor)
    }

    /// Resolve into a selectable source.
    ///
    /// # Errors
    ///
    /// See [`flavor`](Self::flavor) and [`AlertmanagerSource::new`].
    pub fn to_source(&self) -> CoreResult<AlertmanagerSource> {
        AlertmanagerSource::new(self.uid.clone(), self.flavor()?)
    }
}
