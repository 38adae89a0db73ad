//! Gas-turbine power station fleet simulator.
//!
//! Units accumulate weighted run hours, go down for preventive maintenance
//! and overhauls, and are covered by a designated hot or cold reserve unit
//! while they are out of service.

pub mod config;
pub mod error;
pub mod fleet;
/// CSV export of hourly telemetry and unit summaries.
pub mod io;
pub mod search;
/// Hourly engine, maintenance and reserve policies, and run reporting.
pub mod sim;
