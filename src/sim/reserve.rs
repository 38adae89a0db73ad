//! Hot and cold reserve designation and substitution.

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::fleet::{Unit, UnitSpec, UnitStatus};

/// Upper bound (exclusive) on the load factor of a hot reserve unit.
pub const HOT_RESERVE_MAX_LOAD_FACTOR: f64 = 0.15;

/// Which reserve pool a unit is held in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReserveKind {
    /// Running at a light load, ready to take over immediately.
    Hot,
    /// Idle at zero load, needs a cold start.
    Cold,
}

impl ReserveKind {
    /// Returns `true` if `unit` may be designated as this kind of reserve.
    ///
    /// Hot reserve needs `0 < load < 0.15`; cold reserve needs exactly zero.
    pub fn is_eligible(self, unit: &Unit) -> bool {
        if unit.status != UnitStatus::Running {
            return false;
        }
        let lf = unit.average_load_factor;
        match self {
            Self::Hot => lf > 0.0 && lf < HOT_RESERVE_MAX_LOAD_FACTOR,
            Self::Cold => lf == 0.0,
        }
    }

    pub fn status(self) -> UnitStatus {
        match self {
            Self::Hot => UnitStatus::HotReserve,
            Self::Cold => UnitStatus::ColdReserve,
        }
    }
}

/// How one unit entering maintenance was covered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReserveOutcome {
    Hot {
        reserve_unit: usize,
    },
    Cold {
        reserve_unit: usize,
        /// When the cold-started unit reaches load.
        ready_at: NaiveDateTime,
    },
    /// No reserve was available; the unit's capacity is lost for its downtime.
    Unmet,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Substitution {
    /// Unit that entered maintenance.
    pub covered_unit: usize,
    pub outcome: ReserveOutcome,
}

/// Tracks the designated hot and cold reserve units by index.
///
/// Handles are indices into the fleet's unit slice. A handle is either
/// empty or points at a unit whose status matches the reserve kind.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReservePolicy {
    hot: Option<usize>,
    cold: Option<usize>,
}

impl ReservePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the designated hot reserve unit.
    pub fn hot_reserve(&self) -> Option<usize> {
        self.hot
    }

    /// Index of the designated cold reserve unit.
    pub fn cold_reserve(&self) -> Option<usize> {
        self.cold
    }

    /// Designates both reserves for a freshly built fleet, hot first.
    pub fn assign_initial(&mut self, units: &mut [Unit]) {
        self.select(ReserveKind::Hot, units);
        self.select(ReserveKind::Cold, units);
    }

    /// Recomputes the `kind` reserve from scratch over the `Running` units.
    ///
    /// Any unit currently held as this kind of reserve is released back to
    /// `Running` first. The eligible unit with the fewest run hours wins;
    /// ties go to the lowest id.
    pub fn select(&mut self, kind: ReserveKind, units: &mut [Unit]) -> Option<usize> {
        if let Some(current) = self.handle(kind).take() {
            if let Some(unit) = units.get_mut(current) {
                if unit.status == kind.status() {
                    unit.status = UnitStatus::Running;
                }
            }
        }

        let chosen = units
            .iter()
            .filter(|u| kind.is_eligible(u))
            // min_by keeps the first of equal elements, i.e. the lowest id
            .min_by(|a, b| a.total_run_hours.total_cmp(&b.total_run_hours))
            .map(|u| u.id);

        if let Some(idx) = chosen {
            units[idx].status = kind.status();
            debug!(unit = idx, ?kind, "reserve designated");
        } else {
            debug!(?kind, "no eligible reserve unit");
        }
        *self.handle(kind) = chosen;
        chosen
    }

    /// Covers the units that entered maintenance this hour.
    ///
    /// `pending` must be in unit-id order. At most one hot-reserve
    /// activation happens per call; every other entry falls back to the cold
    /// reserve. Each consumed reserve is reselected immediately over every
    /// `Running` unit, the one just activated included.
    pub fn substitute(
        &mut self,
        pending: &[usize],
        units: &mut [Unit],
        spec: &UnitSpec,
        now: NaiveDateTime,
    ) -> Vec<Substitution> {
        let mut hot_used = false;
        let mut out = Vec::with_capacity(pending.len());

        for &covered_unit in pending {
            let hot = if hot_used {
                None
            } else {
                self.ready(ReserveKind::Hot, units)
            };
            let outcome = if let Some(idx) = hot {
                hot_used = true;
                self.activate(ReserveKind::Hot, idx, units);
                info!(covered_unit, reserve_unit = idx, "hot reserve activated");
                ReserveOutcome::Hot { reserve_unit: idx }
            } else if let Some(idx) = self.ready(ReserveKind::Cold, units) {
                self.activate(ReserveKind::Cold, idx, units);
                let ready_at = cold_start_lead(spec)
                    .and_then(|lead| now.checked_add_signed(lead))
                    .unwrap_or(NaiveDateTime::MAX);
                info!(covered_unit, reserve_unit = idx, %ready_at, "cold reserve activated");
                ReserveOutcome::Cold {
                    reserve_unit: idx,
                    ready_at,
                }
            } else {
                warn!(covered_unit, %now, "no reserve available, capacity lost for maintenance");
                ReserveOutcome::Unmet
            };
            out.push(Substitution {
                covered_unit,
                outcome,
            });
        }

        out
    }

    fn handle(&mut self, kind: ReserveKind) -> &mut Option<usize> {
        match kind {
            ReserveKind::Hot => &mut self.hot,
            ReserveKind::Cold => &mut self.cold,
        }
    }

    fn ready(&self, kind: ReserveKind, units: &[Unit]) -> Option<usize> {
        let idx = match kind {
            ReserveKind::Hot => self.hot,
            ReserveKind::Cold => self.cold,
        }?;
        units
            .get(idx)
            .filter(|u| u.status == kind.status())
            .map(|u| u.id)
    }

    fn activate(&mut self, kind: ReserveKind, idx: usize, units: &mut [Unit]) {
        units[idx].status = UnitStatus::Running;
        *self.handle(kind) = None;
        self.select(kind, units);
    }
}

fn cold_start_lead(spec: &UnitSpec) -> Option<TimeDelta> {
    TimeDelta::try_seconds((spec.cold_start_lead_hours * 3600.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid test timestamp")
    }

    fn fleet(load_factors: &[f64]) -> Vec<Unit> {
        load_factors
            .iter()
            .enumerate()
            .map(|(id, &lf)| Unit::new(id, lf))
            .collect()
    }

    fn count(units: &[Unit], status: UnitStatus) -> usize {
        units.iter().filter(|u| u.status == status).count()
    }

    #[test]
    fn hot_reserve_band_excludes_zero_and_upper_bound() {
        let mut units = fleet(&[0.0, 0.15, 0.5]);
        let mut policy = ReservePolicy::new();
        assert_eq!(policy.select(ReserveKind::Hot, &mut units), None);
        assert_eq!(count(&units, UnitStatus::HotReserve), 0);
    }

    #[test]
    fn zero_load_unit_is_cold_eligible_only() {
        let mut units = fleet(&[0.0, 0.15]);
        let mut policy = ReservePolicy::new();
        policy.assign_initial(&mut units);
        assert_eq!(policy.hot_reserve(), None);
        assert_eq!(policy.cold_reserve(), Some(0));
        assert_eq!(units[0].status, UnitStatus::ColdReserve);
        assert_eq!(units[1].status, UnitStatus::Running);
    }

    #[test]
    fn selection_prefers_fewest_run_hours_then_lowest_id() {
        let mut units = fleet(&[0.1, 0.1, 0.1]);
        units[0].total_run_hours = 20.0;
        units[1].total_run_hours = 5.0;
        units[2].total_run_hours = 5.0;
        let mut policy = ReservePolicy::new();
        assert_eq!(policy.select(ReserveKind::Hot, &mut units), Some(1));
    }

    #[test]
    fn reselect_releases_previous_reserve() {
        let mut units = fleet(&[0.1, 0.1]);
        let mut policy = ReservePolicy::new();
        policy.select(ReserveKind::Hot, &mut units);
        units[1].total_run_hours = -1.0;
        policy.select(ReserveKind::Hot, &mut units);
        assert_eq!(policy.hot_reserve(), Some(1));
        assert_eq!(count(&units, UnitStatus::HotReserve), 1);
        assert_eq!(units[0].status, UnitStatus::Running);
    }

    #[test]
    fn only_one_hot_substitution_per_call() {
        // units 0 and 1 go to maintenance; 2 and 3 are hot candidates; 4 is cold
        let mut units = fleet(&[0.8, 0.8, 0.1, 0.1, 0.0]);
        let mut policy = ReservePolicy::new();
        policy.assign_initial(&mut units);
        assert_eq!(policy.hot_reserve(), Some(2));
        assert_eq!(policy.cold_reserve(), Some(4));
        units[0].status = UnitStatus::UnderPreventiveMaintenance;
        units[1].status = UnitStatus::UnderPreventiveMaintenance;

        let subs = policy.substitute(&[0, 1], &mut units, &UnitSpec::default(), now());

        assert_eq!(subs[0].outcome, ReserveOutcome::Hot { reserve_unit: 2 });
        assert_eq!(
            subs[1].outcome,
            ReserveOutcome::Cold {
                reserve_unit: 4,
                ready_at: now() + TimeDelta::hours(2),
            }
        );
        // both activated units are back in the pool and win the reselection
        assert_eq!(policy.hot_reserve(), Some(2));
        assert_eq!(units[2].status, UnitStatus::HotReserve);
        assert_eq!(units[3].status, UnitStatus::Running);
        assert_eq!(policy.cold_reserve(), Some(4));
        assert_eq!(units[4].status, UnitStatus::ColdReserve);
    }

    #[test]
    fn activated_hot_reserve_is_redesignated_in_same_pass() {
        let mut units = fleet(&[0.8, 0.1]);
        let mut policy = ReservePolicy::new();
        policy.assign_initial(&mut units);
        units[0].status = UnitStatus::UnderOverhaul;

        let subs = policy.substitute(&[0], &mut units, &UnitSpec::default(), now());

        assert_eq!(subs[0].outcome, ReserveOutcome::Hot { reserve_unit: 1 });
        assert_eq!(units[1].status, UnitStatus::HotReserve);
        assert_eq!(policy.hot_reserve(), Some(1));
    }

    #[test]
    fn cold_ready_time_saturates_at_end_of_calendar() {
        let mut units = fleet(&[0.8, 0.0]);
        let mut policy = ReservePolicy::new();
        policy.assign_initial(&mut units);
        units[0].status = UnitStatus::UnderPreventiveMaintenance;
        let spec = UnitSpec {
            cold_start_lead_hours: crate::fleet::spec::MAX_COLD_START_LEAD_HOURS,
            ..UnitSpec::default()
        };
        let late = NaiveDateTime::MAX - TimeDelta::hours(1);

        let subs = policy.substitute(&[0], &mut units, &spec, late);

        assert_eq!(
            subs[0].outcome,
            ReserveOutcome::Cold {
                reserve_unit: 1,
                ready_at: NaiveDateTime::MAX,
            }
        );
    }

    #[test]
    fn unmet_when_no_reserve_available() {
        let mut units = fleet(&[0.8, 0.9]);
        let mut policy = ReservePolicy::new();
        policy.assign_initial(&mut units);
        units[0].status = UnitStatus::UnderPreventiveMaintenance;

        let subs = policy.substitute(&[0], &mut units, &UnitSpec::default(), now());

        assert_eq!(
            subs,
            vec![Substitution {
                covered_unit: 0,
                outcome: ReserveOutcome::Unmet,
            }]
        );
    }
}
