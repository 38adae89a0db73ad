//! Post-run report computed from the engine's totals and unit counters.

use std::fmt;

use serde::Serialize;

use crate::fleet::{Unit, UnitStatus};

use super::engine::FleetEngine;

/// Per-unit diagnostics at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitReport {
    pub id: usize,
    pub status: UnitStatus,
    pub average_load_factor: f64,
    pub total_run_hours: f64,
    pub hours_since_preventive: f64,
    pub hours_since_overhaul: f64,
    pub preventive_count: u32,
    pub overhaul_count: u32,
    pub downtime_hours: f64,
    pub maintenance_cost_accrued: f64,
}

impl From<&Unit> for UnitReport {
    fn from(u: &Unit) -> Self {
        Self {
            id: u.id,
            status: u.status,
            average_load_factor: u.average_load_factor,
            total_run_hours: u.total_run_hours,
            hours_since_preventive: u.hours_since_preventive,
            hours_since_overhaul: u.hours_since_overhaul,
            preventive_count: u.preventive_count,
            overhaul_count: u.overhaul_count,
            downtime_hours: u.downtime_hours,
            maintenance_cost_accrued: u.maintenance_cost_accrued,
        }
    }
}

/// Aggregate results of a complete run.
///
/// `total_cost` is the station summary: the value of the generated energy
/// plus maintenance plus salary. `cost_per_mwh` is the operating cost per
/// generated MWh, the scalar a search loop minimises.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub hours_simulated: usize,
    pub total_energy_generated_mwh: f64,
    /// Energy over the nameplate energy of the whole fleet for the run.
    pub capacity_factor: f64,
    pub energy_value: f64,
    pub total_maintenance_cost: f64,
    pub total_salary_cost: f64,
    pub total_cost: f64,
    /// Maintenance plus salary over generated energy; infinite for an idle run.
    pub cost_per_mwh: f64,
    pub preventive_events: u32,
    pub overhaul_events: u32,
    pub total_downtime_hours: f64,
    pub hot_substitutions: usize,
    pub cold_substitutions: usize,
    pub unmet_substitutions: usize,
    pub units: Vec<UnitReport>,
}

impl RunReport {
    /// Reads totals and unit counters from `engine`.
    pub fn from_engine(engine: &FleetEngine) -> Self {
        let totals = engine.totals();
        let spec = engine.spec();
        let units: Vec<UnitReport> = engine.units().iter().map(UnitReport::from).collect();

        let nameplate_mwh = spec.rated_power_mw * units.len() as f64 * totals.hours_simulated as f64;
        let capacity_factor = if nameplate_mwh > 0.0 {
            totals.total_energy_generated_mwh / nameplate_mwh
        } else {
            0.0
        };
        let energy_value = totals.total_energy_generated_mwh * engine.costs().energy_price_per_mwh;
        let operating_cost = totals.total_maintenance_cost + totals.total_salary_cost;
        let cost_per_mwh = if totals.total_energy_generated_mwh > 0.0 {
            operating_cost / totals.total_energy_generated_mwh
        } else {
            f64::INFINITY
        };

        Self {
            hours_simulated: totals.hours_simulated,
            total_energy_generated_mwh: totals.total_energy_generated_mwh,
            capacity_factor,
            energy_value,
            total_maintenance_cost: totals.total_maintenance_cost,
            total_salary_cost: totals.total_salary_cost,
            total_cost: energy_value + operating_cost,
            cost_per_mwh,
            preventive_events: units.iter().map(|u| u.preventive_count).sum(),
            overhaul_events: units.iter().map(|u| u.overhaul_count).sum(),
            total_downtime_hours: units.iter().map(|u| u.downtime_hours).sum(),
            hot_substitutions: totals.hot_substitutions,
            cold_substitutions: totals.cold_substitutions,
            unmet_substitutions: totals.unmet_substitutions,
            units,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Run Report ---")?;
        writeln!(f, "Hours simulated:       {}", self.hours_simulated)?;
        writeln!(
            f,
            "Energy generated:      {:.2} MWh (capacity factor {:.1}%)",
            self.total_energy_generated_mwh,
            self.capacity_factor * 100.0
        )?;
        writeln!(f, "Energy value:          {:.2}", self.energy_value)?;
        writeln!(f, "Maintenance cost:      {:.2}", self.total_maintenance_cost)?;
        writeln!(f, "Salary cost:           {:.2}", self.total_salary_cost)?;
        writeln!(f, "Total cost:            {:.2}", self.total_cost)?;
        writeln!(f, "Cost per MWh:          {:.2}", self.cost_per_mwh)?;
        writeln!(
            f,
            "Maintenance events:    {} preventive, {} overhaul ({:.0} h downtime)",
            self.preventive_events, self.overhaul_events, self.total_downtime_hours
        )?;
        write!(
            f,
            "Substitutions:         {} hot, {} cold, {} unmet",
            self.hot_substitutions, self.cold_substitutions, self.unmet_substitutions
        )
    }
}
