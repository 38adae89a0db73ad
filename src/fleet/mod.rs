//! Generating-unit data model for the station fleet.

/// Station-wide unit parameters.
pub mod spec;
/// Per-unit state and counters.
pub mod unit;

pub use spec::UnitSpec;
pub use unit::{Unit, UnitStatus};
