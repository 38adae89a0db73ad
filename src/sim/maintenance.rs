//! Preventive-maintenance and overhaul scheduling.

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::fleet::{Unit, UnitSpec, UnitStatus};

/// Fixed duration of a preventive maintenance event.
pub const PREVENTIVE_DURATION_HOURS: i64 = 72;
/// Fixed duration of an overhaul.
pub const OVERHAUL_DURATION_HOURS: i64 = 168;

/// Kind of scheduled service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceKind {
    Preventive,
    Overhaul,
}

impl MaintenanceKind {
    /// Evaluation order when several thresholds are exceeded in the same hour.
    ///
    /// Only the first due kind starts; a later kind stays pending until the
    /// unit is `Running` again and is re-evaluated.
    pub const PRIORITY: [Self; 2] = [Self::Preventive, Self::Overhaul];

    pub fn duration(self) -> TimeDelta {
        match self {
            Self::Preventive => TimeDelta::hours(PREVENTIVE_DURATION_HOURS),
            Self::Overhaul => TimeDelta::hours(OVERHAUL_DURATION_HOURS),
        }
    }

    /// Unit status while this kind of service is in progress.
    pub fn status(self) -> UnitStatus {
        match self {
            Self::Preventive => UnitStatus::UnderPreventiveMaintenance,
            Self::Overhaul => UnitStatus::UnderOverhaul,
        }
    }

    pub fn cost(self, spec: &UnitSpec) -> f64 {
        match self {
            Self::Preventive => spec.preventive_cost,
            Self::Overhaul => spec.overhaul_cost,
        }
    }

    fn hours_since(self, unit: &Unit) -> f64 {
        match self {
            Self::Preventive => unit.hours_since_preventive,
            Self::Overhaul => unit.hours_since_overhaul,
        }
    }

    fn interval(self, spec: &UnitSpec) -> f64 {
        match self {
            Self::Preventive => spec.preventive_interval_hours,
            Self::Overhaul => spec.overhaul_interval_hours,
        }
    }
}

/// A maintenance event that has just been opened on a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaintenanceStart {
    pub kind: MaintenanceKind,
    pub end_time: NaiveDateTime,
    /// Cost charged to the unit, to be added to the fleet total as well.
    pub cost: f64,
}

/// Threshold-driven maintenance policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct MaintenancePolicy;

impl MaintenancePolicy {
    /// Returns the service a `Running` unit is due for, honouring
    /// [`MaintenanceKind::PRIORITY`].
    pub fn due(&self, unit: &Unit, spec: &UnitSpec) -> Option<MaintenanceKind> {
        if unit.status != UnitStatus::Running {
            return None;
        }
        MaintenanceKind::PRIORITY
            .into_iter()
            .find(|kind| kind.hours_since(unit) >= kind.interval(spec))
    }

    /// Opens a maintenance event on `unit` if one is due.
    ///
    /// Sets the maintenance status and end time, bumps the matching counter,
    /// resets the matching run-hour counter, books the full downtime and
    /// charges the cost to the unit.
    pub fn start(
        &self,
        unit: &mut Unit,
        spec: &UnitSpec,
        now: NaiveDateTime,
    ) -> Option<MaintenanceStart> {
        let kind = self.due(unit, spec)?;
        let duration = kind.duration();
        let end_time = now.checked_add_signed(duration).unwrap_or(NaiveDateTime::MAX);
        let cost = kind.cost(spec);

        unit.status = kind.status();
        unit.maintenance_end_time = Some(end_time);
        match kind {
            MaintenanceKind::Preventive => {
                unit.preventive_count += 1;
                unit.hours_since_preventive = 0.0;
            }
            MaintenanceKind::Overhaul => {
                unit.overhaul_count += 1;
                unit.hours_since_overhaul = 0.0;
            }
        }
        unit.downtime_hours += duration.num_hours() as f64;
        unit.maintenance_cost_accrued += cost;

        Some(MaintenanceStart {
            kind,
            end_time,
            cost,
        })
    }

    /// Returns a unit to `Running` once its maintenance end time is reached.
    pub fn end(&self, unit: &mut Unit, now: NaiveDateTime) -> bool {
        if !unit.status.is_maintenance() {
            return false;
        }
        match unit.maintenance_end_time {
            Some(end) if now >= end => {
                unit.status = UnitStatus::Running;
                unit.maintenance_end_time = None;
                true
            }
            _ => false,
        }
    }
}
