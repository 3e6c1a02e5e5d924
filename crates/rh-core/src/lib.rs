//! # rh-core — shared types for ReelHall
//!
//! Base vocabulary used by every other crate in the workspace: the error
//! taxonomy, player identity, and the integer money unit.

pub mod error;
pub mod types;

pub use error::{RhError, RhResult};
pub use types::{Credits, PlayerId};
