use std::collections::HashMap;

/// Which configuration layer a value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLayer {
    /// Compiled-in defaults (`defaults.toml`).
    Defaults,
    /// System-wide configuration (`/etc/herald/config.toml`).
    System,
    /// User-level configuration (`~/.herald/config.toml`).
    User,
    /// Workspace-level configuration (`{workspace}/.herald/config.toml`).
    Workspace,
    /// Environment variable fallback.
    Environment,
}

impl ConfigLayer {
    /// Whether the value came from a config file rather than the built-in
    /// defaults or the environment.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::System | Self::User | Self::Workspace)
    }
}

impl std::fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Defaults => write!(f, "defaults"),
            Self::System => write!(f, "system (/etc/herald/config.toml)"),
            Self::User => write!(f, "user (~/.herald/config.toml)"),
            Self::Workspace => write!(f, "workspace (.herald/config.toml)"),
            Self::Environment => write!(f, "environment variable"),
        }
    }
}

/// Tracks which layer set each field's value.
pub type FieldSources = HashMap<String, ConfigLayer>;
