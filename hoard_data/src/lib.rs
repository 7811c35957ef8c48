//! Shared data model for Hoard item catalogs.

pub mod defs;
pub mod validate;

pub use defs::*;
pub use validate::{ValidationError, validate_catalog};
