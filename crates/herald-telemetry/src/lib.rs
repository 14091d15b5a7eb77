//! Herald Telemetry - Logging and request correlation.
//!
//! This crate provides:
//! - Logging setup with pretty, compact, JSON and full formats, written to
//!   stdout, stderr or rolling files
//! - A request context whose span groups the events of one evaluation
//! - With the `config` feature, conversion from the `[logging]` section of
//!   `herald-config`
//!
//! # Example
//!
//! ```rust,no_run
//! use herald_telemetry::{LogConfig, LogFormat, RequestContext, RequestGuard, setup_logging};
//!
//! # fn main() -> Result<(), herald_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Json)
//!     .with_directive("herald_policy=debug");
//!
//! setup_logging(&config)?;
//!
//! let _guard = RequestGuard::new(
//!     RequestContext::new("evaluate").with_alertmanager("grafana"),
//! );
//! tracing::info!("evaluating contact points");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod context;
mod error;
mod logging;

pub use context::{RequestContext, RequestGuard};
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging,
    setup_logging,
};
