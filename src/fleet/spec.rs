use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Longest accepted cold-start lead time: one year.
pub const MAX_COLD_START_LEAD_HOURS: f64 = 8760.0;

/// Nameplate and service parameters shared by every unit of the station.
///
/// # Examples
///
/// ```
/// use gtes_sim::fleet::UnitSpec;
///
/// let spec = UnitSpec::default();
/// assert_eq!(spec.count, 9);
/// assert!(spec.validate().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    /// Rated electrical power of one unit (MW).
    pub rated_power_mw: f64,
    /// Number of units in the station.
    pub count: usize,
    /// Weighted run hours between preventive maintenance events.
    pub preventive_interval_hours: f64,
    /// Cost of one preventive maintenance event.
    pub preventive_cost: f64,
    /// Weighted run hours between overhauls.
    pub overhaul_interval_hours: f64,
    /// Cost of one overhaul.
    pub overhaul_cost: f64,
    /// Hours needed to bring a cold reserve unit to load.
    pub cold_start_lead_hours: f64,
}

impl Default for UnitSpec {
    fn default() -> Self {
        Self {
            rated_power_mw: 16.0,
            count: 9,
            preventive_interval_hours: 1500.0,
            preventive_cost: 15_000_000.0,
            overhaul_interval_hours: 10_000.0,
            overhaul_cost: 75_000_000.0,
            cold_start_lead_hours: 2.0,
        }
    }
}

impl UnitSpec {
    /// Checks every field and returns all violations.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.count == 0 {
            errors.push(ConfigError::new("units.count", "must be > 0"));
        }
        let positive = [
            ("units.rated_power_mw", self.rated_power_mw),
            ("units.preventive_interval_hours", self.preventive_interval_hours),
            ("units.preventive_cost", self.preventive_cost),
            ("units.overhaul_interval_hours", self.overhaul_interval_hours),
            ("units.overhaul_cost", self.overhaul_cost),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                errors.push(ConfigError::new(field, "must be a finite number > 0"));
            }
        }
        if !(0.0..=MAX_COLD_START_LEAD_HOURS).contains(&self.cold_start_lead_hours) {
            errors.push(ConfigError::new(
                "units.cold_start_lead_hours",
                format!("must be in [0, {MAX_COLD_START_LEAD_HOURS}]"),
            ));
        }

        errors
    }

    /// Checks a per-unit load-factor vector against this spec.
    pub fn validate_load_factors(&self, load_factors: &[f64]) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if load_factors.len() != self.count {
            errors.push(ConfigError::new(
                "units.load_factors",
                format!(
                    "expected {} values (one per unit), got {}",
                    self.count,
                    load_factors.len()
                ),
            ));
        }
        for (i, lf) in load_factors.iter().enumerate() {
            if !(0.0..=1.0).contains(lf) {
                errors.push(ConfigError::new(
                    format!("units.load_factors[{i}]"),
                    format!("must be in [0.0, 1.0], got {lf}"),
                ));
            }
        }

        errors
    }
}
