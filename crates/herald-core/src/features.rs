//! Feature toggles and license features.
//!
//! Both are resolved by the hosting application and passed in as values so
//! the action policy never consults global state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// License feature that enables resource-level permission management.
pub const ACCESS_CONTROL_FEATURE: &str = "accesscontrol";

/// Feature toggles that change Alertmanager capabilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Contact points are served by the alerting API server, which carries
    /// per-resource access control.
    pub alerting_api_server: bool,
}

impl FeatureFlags {
    /// Enable the alerting API server toggle.
    #[must_use]
    pub fn with_alerting_api_server(mut self) -> Self {
        self.alerting_api_server = true;
        self
    }
}

/// Features unlocked by the installed license.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseFeatures {
    features: BTreeSet<String>,
}

impl LicenseFeatures {
    /// No licensed features.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Build from feature names. Names are compared case-insensitively.
    #[must_use]
    pub fn from_features<I, S>(features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            features: features
                .into_iter()
                .map(|f| f.as_ref().trim().to_ascii_lowercase())
                .filter(|f| !f.is_empty())
                .collect(),
        }
    }

    /// Whether a feature is licensed.
    #[must_use]
    pub fn is_enabled(&self, feature: &str) -> bool {
        self.features.contains(&feature.to_ascii_lowercase())
    }

    /// Whether the access-control feature is licensed.
    #[must_use]
    pub fn has_access_control(&self) -> bool {
        self.is_enabled(ACCESS_CONTROL_FEATURE)
    }

    /// Licensed feature names, sorted.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_control_detection() {
        assert!(!LicenseFeatures::none().has_access_control());
        assert!(LicenseFeatures::from_features(["AccessControl"]).has_access_control());
        assert!(!LicenseFeatures::from_features(["reporting"]).has_access_control());
    }

    #[test]
    fn test_blank_features_dropped() {
        let license = LicenseFeatures::from_features(["", "  ", "reporting"]);
        assert_eq!(license.iter().collect::<Vec<_>>(), vec!["reporting"]);
    }

    #[test]
    fn test_feature_flags_default_off() {
        assert!(!FeatureFlags::default().alerting_api_server);
        assert!(FeatureFlags::default().with_alerting_api_server().alerting_api_server);
    }
}
