use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

/// Lifecycle state of a generating unit.
///
/// Exactly one state holds at a time. The two maintenance states are the
/// only ones with a scheduled exit (see [`Unit::maintenance_end_time`]);
/// every other transition is made by a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    Running,
    HotReserve,
    ColdReserve,
    UnderPreventiveMaintenance,
    UnderOverhaul,
}

impl UnitStatus {
    /// Returns `true` for states that generate energy and accumulate run hours.
    pub fn is_active(self) -> bool {
        match self {
            Self::Running | Self::HotReserve => true,
            Self::ColdReserve | Self::UnderPreventiveMaintenance | Self::UnderOverhaul => false,
        }
    }

    /// Returns `true` for the two maintenance states.
    pub fn is_maintenance(self) -> bool {
        match self {
            Self::UnderPreventiveMaintenance | Self::UnderOverhaul => true,
            Self::Running | Self::HotReserve | Self::ColdReserve => false,
        }
    }

    /// Short label used in the unit display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::HotReserve => "hot_reserve",
            Self::ColdReserve => "cold_reserve",
            Self::UnderPreventiveMaintenance => "preventive",
            Self::UnderOverhaul => "overhaul",
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One gas-turbine unit of the station.
///
/// Plain state and counters; the maintenance and reserve policies perform
/// every mutation. Run-hour counters are load-factor weighted: an hour at
/// load factor 0.5 adds 0.5 h.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unit {
    /// Stable identity, equal to the unit's position in the fleet.
    pub id: usize,

    /// Fraction of rated power delivered while active (0.0 to 1.0).
    pub average_load_factor: f64,

    pub status: UnitStatus,

    /// Weighted run hours since creation.
    pub total_run_hours: f64,

    /// Weighted run hours since the last preventive maintenance started.
    pub hours_since_preventive: f64,

    /// Weighted run hours since the last overhaul started.
    pub hours_since_overhaul: f64,

    /// When the current maintenance event ends, `None` outside maintenance.
    pub maintenance_end_time: Option<NaiveDateTime>,

    pub preventive_count: u32,
    pub overhaul_count: u32,

    /// Hours spent in maintenance, booked in full when an event starts.
    pub downtime_hours: f64,

    pub maintenance_cost_accrued: f64,
}

impl Unit {
    /// Creates a unit in the initial `Running` state with zeroed counters.
    pub fn new(id: usize, average_load_factor: f64) -> Self {
        Self {
            id,
            average_load_factor,
            status: UnitStatus::Running,
            total_run_hours: 0.0,
            hours_since_preventive: 0.0,
            hours_since_overhaul: 0.0,
            maintenance_end_time: None,
            preventive_count: 0,
            overhaul_count: 0,
            downtime_hours: 0.0,
            maintenance_cost_accrued: 0.0,
        }
    }

    /// Adds `hours` of operation weighted by the load factor.
    ///
    /// Returns the energy produced in MWh for a unit rated `rated_power_mw`.
    pub(crate) fn integrate(&mut self, hours: f64, rated_power_mw: f64) -> f64 {
        let effective_hours = self.average_load_factor * hours;
        self.total_run_hours += effective_hours;
        self.hours_since_preventive += effective_hours;
        self.hours_since_overhaul += effective_hours;
        rated_power_mw * self.average_load_factor * hours
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GTU {:>2} | {:<12} load={:.2} | run={:>9.1} h  since_pm={:>7.1} h  since_oh={:>8.1} h \
             | PM={} OH={} downtime={:.0} h | maintenance={:.2}",
            self.id,
            self.status.label(),
            self.average_load_factor,
            self.total_run_hours,
            self.hours_since_preventive,
            self.hours_since_overhaul,
            self.preventive_count,
            self.overhaul_count,
            self.downtime_hours,
            self.maintenance_cost_accrued,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_unit_is_running_with_zero_counters() {
        let unit = Unit::new(3, 0.4);
        assert_eq!(unit.id, 3);
        assert_eq!(unit.status, UnitStatus::Running);
        assert_eq!(unit.total_run_hours, 0.0);
        assert_eq!(unit.preventive_count, 0);
        assert!(unit.maintenance_end_time.is_none());
    }

    #[test]
    fn integrate_weights_run_hours_by_load_factor() {
        let mut unit = Unit::new(0, 0.5);
        let energy = unit.integrate(1.0, 16.0);
        assert_eq!(energy, 8.0);
        assert_eq!(unit.total_run_hours, 0.5);
        assert_eq!(unit.hours_since_preventive, 0.5);
        assert_eq!(unit.hours_since_overhaul, 0.5);
    }

    #[test]
    fn active_and_maintenance_states_are_disjoint() {
        let all = [
            UnitStatus::Running,
            UnitStatus::HotReserve,
            UnitStatus::ColdReserve,
            UnitStatus::UnderPreventiveMaintenance,
            UnitStatus::UnderOverhaul,
        ];
        for status in all {
            assert!(!(status.is_active() && status.is_maintenance()), "{status}");
        }
        assert!(!UnitStatus::ColdReserve.is_active());
        assert!(!UnitStatus::ColdReserve.is_maintenance());
    }

    #[test]
    fn display_does_not_panic() {
        let s = format!("{}", Unit::new(1, 0.05));
        assert!(s.contains("GTU  1"));
    }
}
