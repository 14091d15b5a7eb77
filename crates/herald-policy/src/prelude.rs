//! Prelude module - commonly used types for convenient import.
//!
//! Use `use herald_policy::prelude::*;` to import all essential types.

// Errors
pub use crate::{PolicyError, PolicyResult};

// Action states
pub use crate::{ActionState, ContactPointAction, Denial};

// Policy
pub use crate::{ContactPointActionPolicy, ContactPointActions, PageActions, PrimaryAction};

// Listing
pub use crate::{
    ContactPointCatalog, ContactPointRow, ContactPointsTab, ContactPointsView, LoadState,
    ViewQuery, ViewState,
};
