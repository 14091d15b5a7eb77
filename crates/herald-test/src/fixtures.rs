//! Test fixtures for common types.

use herald_core::{
    AccessAction, AlertmanagerDataSource, AlertmanagerSource, CallerPermissions, ContactPoint,
    LicenseFeatures, PolicyLink, ReceiverConfig,
};

/// UID of the Mimir-flavored Alertmanager data source in fixtures.
pub const MIMIR_DATASOURCE_UID: &str = "mimir";

/// UID of the vanilla Prometheus Alertmanager data source in fixtures.
pub const VANILLA_ALERTMANAGER_DATASOURCE_UID: &str = "vanilla-alertmanager";

/// A contact point with no integrations, links or provisioning.
#[must_use]
pub fn basic_contact_point() -> ContactPoint {
    ContactPoint::new("my-contact-point", "foo")
}

/// [`basic_contact_point`] routed to by one user-authored policy.
#[must_use]
pub fn contact_point_with_normal_policy() -> ContactPoint {
    basic_contact_point().with_policy(PolicyLink::normal("my-contact-point"))
}

/// [`basic_contact_point`] routed to by one auto-generated policy only.
#[must_use]
pub fn contact_point_with_auto_generated_policy() -> ContactPoint {
    basic_contact_point().with_policy(PolicyLink::auto_generated("my-contact-point"))
}

/// The Grafana-managed listing: five contact points, one provisioned,
/// three not routed to by any policy.
#[must_use]
pub fn grafana_listing() -> Vec<ContactPoint> {
    vec![
        ContactPoint::new("grafana-default-email", "grafana-default-email")
            .with_receiver(email("xeKQrBrnk", "alerts@example.com"))
            .with_policy(PolicyLink::normal("grafana-default-email")),
        ContactPoint::new("provisioned-contact-point", "provisioned-contact-point")
            .with_receiver(email("s8SdCVjnk", "alerts@example.com"))
            .provisioned(),
        ContactPoint::new("lotsa-emails", "lotsa-emails")
            .with_receiver(email("af306c96", "oncall+1@example.com"))
            .with_receiver(email("c3a2d3e1", "oncall+2@example.com")),
        ContactPoint::new("Slack with multiple channels", "slack-with-multiple-channels")
            .with_receiver(ReceiverConfig::new("slack").with_uid("c02ad56a"))
            .with_receiver(ReceiverConfig::new("slack").with_uid("b7d4c1f0"))
            .with_policy(PolicyLink::normal("Slack with multiple channels")),
        ContactPoint::new("OnCall Contact point", "oncall-contact-point")
            .with_receiver(ReceiverConfig::new("oncall").with_uid("a0b1c2d3")),
    ]
}

/// The Mimir-flavored listing: two contact points, one unused.
#[must_use]
pub fn mimir_listing() -> Vec<ContactPoint> {
    vec![
        ContactPoint::new("mixed", "mixed")
            .with_receiver(ReceiverConfig::new("email"))
            .with_receiver(ReceiverConfig::new("slack"))
            .with_policy(PolicyLink::normal("mixed")),
        ContactPoint::new("some webhook", "some webhook")
            .with_receiver(ReceiverConfig::new("webhook")),
    ]
}

/// The vanilla Alertmanager listing: a single default receiver.
#[must_use]
pub fn vanilla_listing() -> Vec<ContactPoint> {
    vec![
        ContactPoint::new("default", "default")
            .with_receiver(ReceiverConfig::new("email"))
            .with_policy(PolicyLink::normal("default")),
    ]
}

/// The Grafana-managed listing in the shape the contact points API returns.
#[must_use]
pub fn grafana_listing_json() -> serde_json::Value {
    serde_json::json!([
        {
            "name": "grafana-default-email",
            "id": "grafana-default-email",
            "grafana_managed_receiver_configs": [
                {"type": "email", "uid": "xeKQrBrnk", "disableResolveMessage": false,
                 "settings": {"addresses": "alerts@example.com"}}
            ],
            "policies": [
                {"receiver": "grafana-default-email", "route": {"type": "normal"}}
            ]
        },
        {
            "name": "provisioned-contact-point",
            "id": "provisioned-contact-point",
            "provisioned": true,
            "grafana_managed_receiver_configs": [
                {"type": "email", "uid": "s8SdCVjnk",
                 "settings": {"addresses": "alerts@example.com"}}
            ]
        },
        {
            "name": "auto-routed",
            "id": "auto-routed",
            "grafana_managed_receiver_configs": [{"type": "webhook"}],
            "policies": [
                {"receiver": "auto-routed", "route": {"type": "auto-generated"}}
            ]
        }
    ])
}

/// The Grafana-managed Alertmanager.
#[must_use]
pub fn grafana_source() -> AlertmanagerSource {
    AlertmanagerSource::grafana()
}

/// The Mimir-flavored data source.
#[must_use]
pub fn mimir_data_source() -> AlertmanagerDataSource {
    AlertmanagerDataSource {
        uid: MIMIR_DATASOURCE_UID.to_string(),
        implementation: Some("mimir".to_string()),
        handle_grafana_managed_alerts: false,
    }
}

/// The vanilla Prometheus Alertmanager data source.
#[must_use]
pub fn vanilla_data_source() -> AlertmanagerDataSource {
    AlertmanagerDataSource {
        uid: VANILLA_ALERTMANAGER_DATASOURCE_UID.to_string(),
        implementation: Some("prometheus".to_string()),
        handle_grafana_managed_alerts: true,
    }
}

/// Read and write on the Grafana-managed Alertmanager.
#[must_use]
pub fn read_write_internal() -> CallerPermissions {
    CallerPermissions::from_actions([
        AccessAction::NotificationsRead,
        AccessAction::NotificationsWrite,
    ])
}

/// Read only on the Grafana-managed Alertmanager.
#[must_use]
pub fn read_only_internal() -> CallerPermissions {
    CallerPermissions::from_actions([AccessAction::NotificationsRead])
}

/// Read and write on external Alertmanagers.
#[must_use]
pub fn read_write_external() -> CallerPermissions {
    CallerPermissions::from_actions([
        AccessAction::NotificationsExternalRead,
        AccessAction::NotificationsExternalWrite,
    ])
}

/// A license that includes access control.
#[must_use]
pub fn access_control_license() -> LicenseFeatures {
    LicenseFeatures::from_features([herald_core::ACCESS_CONTROL_FEATURE])
}

fn email(uid: &str, addresses: &str) -> ReceiverConfig {
    ReceiverConfig::new("email")
        .with_uid(uid)
        .with_settings(serde_json::json!({ "addresses": addresses }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grafana_listing_shape() {
        let listing = grafana_listing();
        assert_eq!(listing.len(), 5);
        assert_eq!(listing.iter().filter(|cp| cp.provisioned).count(), 1);
        assert_eq!(listing.iter().filter(|cp| !cp.is_in_use()).count(), 3);
    }

    #[test]
    fn test_mimir_listing_shape() {
        let listing = mimir_listing();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing.iter().filter(|cp| !cp.is_in_use()).count(), 1);
    }

    #[test]
    fn test_grafana_listing_json_deserializes() {
        let listing: Vec<ContactPoint> = serde_json::from_value(grafana_listing_json()).unwrap();
        assert_eq!(listing.len(), 3);
        assert!(listing[1].provisioned);
        assert!(listing[2].is_in_use());
        assert!(!listing[2].has_normal_policy_link());
    }

    #[test]
    fn test_data_sources_resolve() {
        assert!(mimir_data_source().to_source().is_ok());
        assert!(vanilla_data_source().to_source().is_ok());
        assert!(grafana_source().is_grafana_managed());
    }
}
