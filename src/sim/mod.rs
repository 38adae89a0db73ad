/// Hourly simulation clock.
pub mod clock;
pub mod engine;
pub mod kpi;
/// Preventive maintenance and overhaul policy.
pub mod maintenance;
/// Hot and cold reserve policy.
pub mod reserve;
pub mod types;
