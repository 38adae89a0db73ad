//! Core simulation types: operating costs, step records, and fleet totals.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::maintenance::MaintenanceKind;
use super::reserve::{ReserveOutcome, Substitution};
use crate::error::ConfigError;

/// Station running costs that do not depend on the unit state machine.
///
/// # Examples
///
/// ```
/// use gtes_sim::sim::types::OperatingCosts;
///
/// let costs = OperatingCosts::default();
/// assert_eq!(costs.monthly_salary, 3_000_000.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingCosts {
    /// Personnel salary lump sum charged once per calendar month.
    pub monthly_salary: f64,
    /// Value of one generated MWh, used for the run's cost fitness.
    pub energy_price_per_mwh: f64,
}

impl Default for OperatingCosts {
    fn default() -> Self {
        Self {
            // 20 staff at 150 000 each
            monthly_salary: 150_000.0 * 20.0,
            energy_price_per_mwh: 5.6,
        }
    }
}

impl OperatingCosts {
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !self.monthly_salary.is_finite() || self.monthly_salary < 0.0 {
            errors.push(ConfigError::new("costs.monthly_salary", "must be a finite number >= 0"));
        }
        if !self.energy_price_per_mwh.is_finite() || self.energy_price_per_mwh < 0.0 {
            errors.push(ConfigError::new(
                "costs.energy_price_per_mwh",
                "must be a finite number >= 0",
            ));
        }
        errors
    }
}

/// Fleet-wide accumulators for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FleetTotals {
    pub total_energy_generated_mwh: f64,
    pub total_salary_cost: f64,
    pub total_maintenance_cost: f64,
    /// Maintenance events covered by the hot reserve.
    pub hot_substitutions: usize,
    /// Maintenance events covered by the cold reserve.
    pub cold_substitutions: usize,
    /// Maintenance events with no reserve to cover them.
    pub unmet_substitutions: usize,
    pub hours_simulated: usize,
}

/// Complete record of one simulated hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    /// Zero-based hour index within the run.
    pub timestep: usize,
    pub time: NaiveDateTime,
    /// Energy generated during this hour (MWh).
    pub energy_mwh: f64,
    /// Energy generated since the run started (MWh).
    pub cumulative_energy_mwh: f64,
    /// Units `Running` at the end of the hour.
    pub running_units: usize,
    pub hot_reserve_units: usize,
    pub cold_reserve_units: usize,
    /// Units in either maintenance state at the end of the hour.
    pub maintenance_units: usize,
    /// Maintenance events opened this hour, as `(unit id, kind)`.
    pub maintenance_started: Vec<(usize, MaintenanceKind)>,
    /// Units that returned from maintenance this hour.
    pub maintenance_ended: Vec<usize>,
    pub substitutions: Vec<Substitution>,
    /// Salary charged this hour (non-zero only on a month rollover).
    pub salary_accrued: f64,
}

impl StepResult {
    pub fn hot_substitutions(&self) -> usize {
        self.count_outcomes(|o| matches!(o, ReserveOutcome::Hot { .. }))
    }

    pub fn cold_substitutions(&self) -> usize {
        self.count_outcomes(|o| matches!(o, ReserveOutcome::Cold { .. }))
    }

    pub fn unmet_substitutions(&self) -> usize {
        self.count_outcomes(|o| matches!(o, ReserveOutcome::Unmet))
    }

    fn count_outcomes(&self, pred: impl Fn(&ReserveOutcome) -> bool) -> usize {
        self.substitutions.iter().filter(|s| pred(&s.outcome)).count()
    }
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>5} ({}) | energy={:>7.2} MWh  total={:>11.2} MWh | run={} hot={} cold={} maint={} \
             | started={} ended={} | subs(hot={}, cold={}, unmet={})",
            self.timestep,
            self.time.format("%Y-%m-%d %H:%M"),
            self.energy_mwh,
            self.cumulative_energy_mwh,
            self.running_units,
            self.hot_reserve_units,
            self.cold_reserve_units,
            self.maintenance_units,
            self.maintenance_started.len(),
            self.maintenance_ended.len(),
            self.hot_substitutions(),
            self.cold_substitutions(),
            self.unmet_substitutions(),
        )?;
        if self.salary_accrued > 0.0 {
            write!(f, " | salary={:.2}", self.salary_accrued)?;
        }
        Ok(())
    }
}
