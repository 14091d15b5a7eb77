//! Error types for parsing core identifiers.

use thiserror::Error;

/// Errors raised while turning external identifiers into core types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The Alertmanager implementation string is not a known flavor.
    #[error("unknown alertmanager flavor: {0}")]
    UnknownFlavor(String),

    /// The access-control action identifier is not recognised.
    #[error("unknown access action: {0}")]
    UnknownAccessAction(String),

    /// The source name and flavor disagree about being Grafana-managed.
    #[error("alertmanager '{name}' cannot be served by the {flavor} flavor")]
    FlavorMismatch {
        /// The source name that was requested.
        name: String,
        /// The flavor that was paired with it.
        flavor: String,
    },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
