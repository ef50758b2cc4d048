//! Configuration module
//!
//! Loads and validates the match configuration: stations, address
//! allow-lists, teams, the two live-match sides, warmup durations and
//! message templates.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLoader, LoadResult, LoadWarning, LoaderOptions};
pub use schema::*;
pub use validation::{ValidationResult, Validator};
