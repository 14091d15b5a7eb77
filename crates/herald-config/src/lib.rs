#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Layered configuration for Herald.
//!
//! A single [`Config`] type carries the selected Alertmanager, feature
//! toggles, license features, default caller grants and logging settings.
//!
//! # Usage
//!
//! ```rust,no_run
//! use herald_config::Config;
//!
//! // Load with full precedence chain (defaults → system → user → workspace → env).
//! let resolved = Config::load(Some(std::path::Path::new("."))).unwrap();
//! println!("Alertmanager: {}", resolved.config.alertmanager.name);
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Workspace** (`{workspace}/.herald/config.toml`), which can only
//!    *narrow* grants, license features and toggles
//! 2. **User** (`~/.herald/config.toml`)
//! 3. **System** (`/etc/herald/config.toml`)
//! 4. **Environment variables** (`HERALD_*`), fallback only
//! 5. **Embedded defaults** (`defaults.toml` compiled into binary)
//!
//! # Design
//!
//! This crate has **no dependencies on other internal herald crates**.
//! Conversion from config strings to domain types happens in the binary.

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Layered configuration merging with precedence.
pub mod merge;
/// Resolved configuration display and serialization.
pub mod show;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use show::{ResolvedConfig, ShowFormat};
pub use types::*;

impl Config {
    /// Load configuration with full precedence chain.
    ///
    /// See [`loader::load`] for the full algorithm.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load(workspace_root: Option<&std::path::Path>) -> ConfigResult<ResolvedConfig> {
        loader::load(workspace_root, None)
    }

    /// Load configuration from a single file (no layering).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load_file(path: &std::path::Path) -> ConfigResult<Self> {
        loader::load_file(path)
    }
}
