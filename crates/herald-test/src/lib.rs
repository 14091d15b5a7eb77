//! Herald Test - Shared test utilities.
//!
//! Fixtures mirroring what the Alertmanager APIs return for each flavor,
//! plus canned permission sets and logging setup for tests.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! herald-test.workspace = true
//! ```
//!
//! Then use in your tests:
//!
//! ```rust,ignore
//! use herald_test::{grafana_listing, read_write_internal};
//!
//! #[test]
//! fn test_grafana_listing() {
//!     let listing = grafana_listing();
//!     assert_eq!(listing.len(), 5);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod harness;

pub use fixtures::*;
pub use harness::*;
