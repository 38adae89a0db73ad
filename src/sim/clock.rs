use chrono::{NaiveDateTime, TimeDelta};

/// A simulation clock that walks calendar hours over a closed range.
///
/// The `HourlyClock` yields `start`, `start + 1h`, ... up to and including
/// `end`, and yields nothing when `end < start`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use gtes_sim::sim::clock::HourlyClock;
///
/// let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(2, 0, 0).unwrap();
/// let mut clock = HourlyClock::new(start, end);
/// let mut hours = Vec::new();
///
/// clock.run(|t| hours.push(t));
/// assert_eq!(hours.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct HourlyClock {
    /// Next time to yield, `None` once the calendar is exhausted
    next: Option<NaiveDateTime>,
    /// Last time to yield (inclusive)
    end: NaiveDateTime,
}

impl HourlyClock {
    /// Fixed step of the simulation, in hours.
    pub const STEP_HOURS: i64 = 1;

    /// Fixed step of the simulation.
    pub fn step() -> TimeDelta {
        TimeDelta::hours(Self::STEP_HOURS)
    }

    /// Creates a clock over `[start, end]`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            next: Some(start),
            end,
        }
    }

    /// Advances the clock by one hour.
    ///
    /// # Returns
    ///
    /// * `Some(time)` - The current time before advancing
    /// * `None` - If the clock has passed `end` or the last representable time
    pub fn tick(&mut self) -> Option<NaiveDateTime> {
        let now = self.next.filter(|t| *t <= self.end)?;
        self.next = now.checked_add_signed(Self::step());
        Some(now)
    }

    /// Runs a function for each remaining hour.
    pub fn run(&mut self, mut f: impl FnMut(NaiveDateTime)) {
        while let Some(now) = self.tick() {
            f(now);
        }
    }

    /// Number of hours left to yield.
    pub fn remaining(&self) -> usize {
        match self.next {
            Some(next) if next <= self.end => {
                usize::try_from((self.end - next).num_hours()).map_or(0, |h| h + 1)
            }
            _ => 0,
        }
    }
}
