//! Contact points and the notification policies that route to them.
//!
//! A contact point is a named destination configuration. Notification
//! policies reference contact points by receiver name; whether a reference
//! was written by a user or generated by the system decides whether it pins
//! the contact point in place.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ReceiverConfig
// ---------------------------------------------------------------------------

/// One integration configured on a contact point (email, Slack, webhook...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverConfig {
    /// Integration kind, e.g. `"email"` or `"slack"`.
    #[serde(rename = "type")]
    pub integration: String,
    /// Stable identifier of this integration, when the API assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Whether resolved notifications are suppressed.
    #[serde(default, alias = "disableResolveMessage")]
    pub disable_resolve_message: bool,
    /// Integration-specific settings, kept opaque.
    #[serde(default)]
    pub settings: serde_json::Value,
}

impl ReceiverConfig {
    /// Create an integration of the given kind with empty settings.
    #[must_use]
    pub fn new(integration: impl Into<String>) -> Self {
        Self {
            integration: integration.into(),
            uid: None,
            disable_resolve_message: false,
            settings: serde_json::Value::Null,
        }
    }

    /// Attach an integration UID.
    #[must_use]
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Attach integration settings.
    #[must_use]
    pub fn with_settings(mut self, settings: serde_json::Value) -> Self {
        self.settings = settings;
        self
    }
}

// ---------------------------------------------------------------------------
// PolicyLink
// ---------------------------------------------------------------------------

/// Who authored the notification policy referencing a contact point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyType {
    /// A routing rule written by a user.
    #[default]
    Normal,
    /// A routing rule created by the system (e.g. simplified routing).
    AutoGenerated,
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::AutoGenerated => write!(f, "auto-generated"),
        }
    }
}

/// A notification policy that routes to a contact point.
///
/// Deserializes from both the flat form
/// (`{"receiver_name": "...", "policy_type": "normal"}`) and the route
/// reference form returned by the notification-policy API
/// (`{"receiver": "...", "route": {"type": "auto-generated"}}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "PolicyLinkRepr")]
pub struct PolicyLink {
    /// Receiver name the policy routes to.
    pub receiver_name: String,
    /// Who authored the policy.
    pub policy_type: PolicyType,
}

impl PolicyLink {
    /// A user-authored policy routing to `receiver_name`.
    #[must_use]
    pub fn normal(receiver_name: impl Into<String>) -> Self {
        Self {
            receiver_name: receiver_name.into(),
            policy_type: PolicyType::Normal,
        }
    }

    /// A system-generated policy routing to `receiver_name`.
    #[must_use]
    pub fn auto_generated(receiver_name: impl Into<String>) -> Self {
        Self {
            receiver_name: receiver_name.into(),
            policy_type: PolicyType::AutoGenerated,
        }
    }

    /// Whether this link pins the contact point against deletion.
    #[must_use]
    pub fn blocks_deletion(&self) -> bool {
        self.policy_type == PolicyType::Normal
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PolicyLinkRepr {
    Flat {
        #[serde(alias = "receiverName")]
        receiver_name: String,
        #[serde(alias = "policyType")]
        policy_type: PolicyType,
    },
    Route {
        receiver: String,
        #[serde(default)]
        route: RouteRepr,
    },
}

#[derive(Default, Deserialize)]
struct RouteRepr {
    #[serde(rename = "type", default)]
    policy_type: PolicyType,
}

impl From<PolicyLinkRepr> for PolicyLink {
    fn from(repr: PolicyLinkRepr) -> Self {
        match repr {
            PolicyLinkRepr::Flat {
                receiver_name,
                policy_type,
            } => Self {
                receiver_name,
                policy_type,
            },
            PolicyLinkRepr::Route { receiver, route } => Self {
                receiver_name: receiver,
                policy_type: route.policy_type,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// ContactPoint
// ---------------------------------------------------------------------------

/// A named destination configuration for alert notifications.
///
/// `name` is unique within one Alertmanager configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    /// Display name, unique per Alertmanager configuration.
    pub name: String,
    /// Identifier assigned by the Alertmanager API.
    pub id: String,
    /// Integrations in configuration order.
    #[serde(
        default,
        alias = "receiverConfigs",
        alias = "grafana_managed_receiver_configs"
    )]
    pub receiver_configs: Vec<ReceiverConfig>,
    /// Managed by configuration-as-code and not editable through the UI.
    #[serde(default)]
    pub provisioned: bool,
    /// Notification policies routing to this contact point.
    #[serde(default, alias = "linkedPolicies", alias = "policies")]
    pub linked_policies: Vec<PolicyLink>,
}

impl ContactPoint {
    /// Create an empty, unprovisioned, unused contact point.
    #[must_use]
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            receiver_configs: Vec::new(),
            provisioned: false,
            linked_policies: Vec::new(),
        }
    }

    /// Append an integration.
    #[must_use]
    pub fn with_receiver(mut self, receiver: ReceiverConfig) -> Self {
        self.receiver_configs.push(receiver);
        self
    }

    /// Append a linked notification policy.
    #[must_use]
    pub fn with_policy(mut self, link: PolicyLink) -> Self {
        self.linked_policies.push(link);
        self
    }

    /// Mark as provisioned.
    #[must_use]
    pub fn provisioned(mut self) -> Self {
        self.provisioned = true;
        self
    }

    /// Whether any notification policy routes here, of either type.
    #[must_use]
    pub fn is_in_use(&self) -> bool {
        !self.linked_policies.is_empty()
    }

    /// Whether a user-authored policy routes here.
    ///
    /// Auto-generated links alone never return `true`.
    #[must_use]
    pub fn has_normal_policy_link(&self) -> bool {
        self.linked_policies.iter().any(PolicyLink::blocks_deletion)
    }

    /// Number of user-authored policies routing here.
    #[must_use]
    pub fn normal_policy_count(&self) -> usize {
        self.linked_policies
            .iter()
            .filter(|link| link.blocks_deletion())
            .count()
    }

    /// Distinct integration kinds, in first-seen order.
    #[must_use]
    pub fn integration_types(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = Vec::with_capacity(self.receiver_configs.len());
        for receiver in &self.receiver_configs {
            if !kinds.contains(&receiver.integration.as_str()) {
                kinds.push(receiver.integration.as_str());
            }
        }
        kinds
    }
}
