//! Fleet engine that advances the station hour by hour.

use chrono::{Datelike, NaiveDateTime};
use tracing::{debug, info};

use crate::error::SimError;
use crate::fleet::{Unit, UnitSpec, UnitStatus};

use super::clock::HourlyClock;
use super::maintenance::MaintenancePolicy;
use super::reserve::{ReserveOutcome, ReservePolicy};
use super::types::{FleetTotals, OperatingCosts, StepResult};

/// Simulation engine owning every unit, both policies, and the run totals.
///
/// Build a fresh engine (or call [`FleetEngine::reset`]) for each
/// independent run; nothing carries over from a previous run.
#[derive(Debug, Clone)]
pub struct FleetEngine {
    spec: UnitSpec,
    costs: OperatingCosts,
    load_factors: Vec<f64>,
    units: Vec<Unit>,
    maintenance: MaintenancePolicy,
    reserves: ReservePolicy,
    totals: FleetTotals,
    /// Calendar (year, month) of the previous tick.
    last_month: Option<(i32, u32)>,
}

impl FleetEngine {
    /// Creates a new engine with one unit per load factor.
    ///
    /// Reserves are designated immediately, hot first, then cold.
    ///
    /// # Arguments
    ///
    /// * `spec` - Unit parameters shared by the whole station
    /// * `load_factors` - Per-unit average load factor, one per unit
    /// * `costs` - Salary and energy price
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] with the first violated
    /// constraint if the spec, the load factors, or the costs are invalid.
    pub fn new(
        spec: UnitSpec,
        load_factors: Vec<f64>,
        costs: OperatingCosts,
    ) -> Result<Self, SimError> {
        let mut errors = spec.validate();
        errors.extend(spec.validate_load_factors(&load_factors));
        errors.extend(costs.validate());
        if let Some(first) = errors.into_iter().next() {
            return Err(first.into());
        }

        let mut engine = Self {
            spec,
            costs,
            load_factors,
            units: Vec::new(),
            maintenance: MaintenancePolicy,
            reserves: ReservePolicy::new(),
            totals: FleetTotals::default(),
            last_month: None,
        };
        engine.reset();
        Ok(engine)
    }

    /// Restores the state of a freshly constructed engine.
    pub fn reset(&mut self) {
        self.units = self
            .load_factors
            .iter()
            .enumerate()
            .map(|(id, &lf)| Unit::new(id, lf))
            .collect();
        self.reserves = ReservePolicy::new();
        self.reserves.assign_initial(&mut self.units);
        self.totals = FleetTotals::default();
        self.last_month = None;
    }

    /// Executes one simulated hour at `now` and returns its record.
    ///
    /// Order within the hour: run-time and energy integration, maintenance
    /// starts, reserve substitution, maintenance completions, then the
    /// monthly salary on a calendar-month change.
    pub fn step(&mut self, now: NaiveDateTime) -> StepResult {
        let hours = HourlyClock::STEP_HOURS as f64;

        // 1. Integrate active units
        let mut energy_mwh = 0.0;
        for unit in self.units.iter_mut().filter(|u| u.status.is_active()) {
            energy_mwh += unit.integrate(hours, self.spec.rated_power_mw);
        }
        self.totals.total_energy_generated_mwh += energy_mwh;

        // 2. Open due maintenance
        let mut maintenance_started = Vec::new();
        for unit in &mut self.units {
            if let Some(started) = self.maintenance.start(unit, &self.spec, now) {
                self.totals.total_maintenance_cost += started.cost;
                debug!(
                    unit = unit.id,
                    kind = ?started.kind,
                    until = %started.end_time,
                    "maintenance started"
                );
                maintenance_started.push((unit.id, started.kind));
            }
        }

        // 3. Cover the units that just left service
        let pending: Vec<usize> = maintenance_started.iter().map(|&(id, _)| id).collect();
        let substitutions = self
            .reserves
            .substitute(&pending, &mut self.units, &self.spec, now);
        for s in &substitutions {
            match s.outcome {
                ReserveOutcome::Hot { .. } => self.totals.hot_substitutions += 1,
                ReserveOutcome::Cold { .. } => self.totals.cold_substitutions += 1,
                ReserveOutcome::Unmet => self.totals.unmet_substitutions += 1,
            }
        }

        // 4. Close finished maintenance
        let mut maintenance_ended = Vec::new();
        for unit in &mut self.units {
            if self.maintenance.end(unit, now) {
                debug!(unit = unit.id, "maintenance finished");
                maintenance_ended.push(unit.id);
            }
        }

        // 5. Monthly salary
        let month = (now.year(), now.month());
        let salary_accrued = if self.last_month == Some(month) {
            0.0
        } else {
            self.last_month = Some(month);
            self.totals.total_salary_cost += self.costs.monthly_salary;
            self.costs.monthly_salary
        };

        let timestep = self.totals.hours_simulated;
        self.totals.hours_simulated += 1;

        StepResult {
            timestep,
            time: now,
            energy_mwh,
            cumulative_energy_mwh: self.totals.total_energy_generated_mwh,
            running_units: self.count_status(UnitStatus::Running),
            hot_reserve_units: self.count_status(UnitStatus::HotReserve),
            cold_reserve_units: self.count_status(UnitStatus::ColdReserve),
            maintenance_units: self.units.iter().filter(|u| u.status.is_maintenance()).count(),
            maintenance_started,
            maintenance_ended,
            substitutions,
            salary_accrued,
        }
    }

    /// Steps hourly from `start` through `end` inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidTimeRange`] if `end < start`; no step runs.
    pub fn simulate(
        &mut self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<StepResult>, SimError> {
        if end < start {
            return Err(SimError::InvalidTimeRange { start, end });
        }

        let mut clock = HourlyClock::new(start, end);
        let mut results = Vec::with_capacity(clock.remaining());
        info!(%start, %end, units = self.units.len(), "simulation started");
        clock.run(|now| results.push(self.step(now)));
        info!(
            hours = results.len(),
            energy_mwh = self.totals.total_energy_generated_mwh,
            maintenance_cost = self.totals.total_maintenance_cost,
            salary_cost = self.totals.total_salary_cost,
            unmet_substitutions = self.totals.unmet_substitutions,
            "simulation finished"
        );
        Ok(results)
    }

    pub fn spec(&self) -> &UnitSpec {
        &self.spec
    }

    pub fn costs(&self) -> &OperatingCosts {
        &self.costs
    }

    pub fn load_factors(&self) -> &[f64] {
        &self.load_factors
    }

    /// Units in id order.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn totals(&self) -> &FleetTotals {
        &self.totals
    }

    /// The designated hot reserve unit, if any.
    pub fn hot_reserve(&self) -> Option<&Unit> {
        self.reserves.hot_reserve().and_then(|i| self.units.get(i))
    }

    /// The designated cold reserve unit, if any.
    pub fn cold_reserve(&self) -> Option<&Unit> {
        self.reserves.cold_reserve().and_then(|i| self.units.get(i))
    }

    fn count_status(&self, status: UnitStatus) -> usize {
        self.units.iter().filter(|u| u.status == status).count()
    }
}
