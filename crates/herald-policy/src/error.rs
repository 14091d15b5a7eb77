use crate::action::{ContactPointAction, Denial};

/// Reasons an attempted contact-point action cannot proceed.
///
/// None of these are fatal: each one corresponds to a hidden or disabled
/// action in the rendered page, or to a contact point that disappeared
/// between listing and acting on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// The Alertmanager flavor or license does not offer the action.
    #[error("{action} is unavailable: {reason}")]
    CapabilityDenied {
        /// The attempted action.
        action: ContactPointAction,
        /// Unsupported or unlicensed.
        reason: Denial,
    },

    /// The caller lacks the scoped grant.
    #[error("{action} denied: insufficient permissions")]
    PermissionDenied {
        /// The attempted action.
        action: ContactPointAction,
    },

    /// The contact point's state forbids the action.
    #[error("{action} blocked: {reason}")]
    StateConflict {
        /// The attempted action.
        action: ContactPointAction,
        /// Provisioned, in use, or locked.
        reason: Denial,
    },

    /// The contact point is no longer present.
    #[error("contact point not found: {name}")]
    NotFound {
        /// The requested contact point name.
        name: String,
    },
}

/// Result type for policy checks.
pub type PolicyResult<T> = Result<T, PolicyError>;
