//! Shared test fixtures for integration tests.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use gtes_sim::fleet::UnitSpec;
use gtes_sim::sim::engine::FleetEngine;
use gtes_sim::sim::types::OperatingCosts;

/// Timestamp at `hour:00` on the given date.
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, 0, 0))
        .expect("valid test timestamp")
}

/// First simulated hour used across tests (2024-06-01 00:00).
pub fn start() -> NaiveDateTime {
    at(2024, 6, 1, 0)
}

/// `hours` after [`start`].
pub fn hours_after_start(hours: i64) -> NaiveDateTime {
    start() + TimeDelta::hours(hours)
}

/// Default 16 MW unit spec sized for `count` units.
pub fn spec(count: usize) -> UnitSpec {
    UnitSpec {
        count,
        ..UnitSpec::default()
    }
}

/// Engine with default unit parameters and costs, one unit per load factor.
pub fn engine(load_factors: &[f64]) -> FleetEngine {
    FleetEngine::new(
        spec(load_factors.len()),
        load_factors.to_vec(),
        OperatingCosts::default(),
    )
    .expect("valid engine")
}
