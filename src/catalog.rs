//! Timeslot catalog.
//!
//! ITC-2007 instances describe time as an abstract `days × periods` grid.
//! This module maps that grid onto concrete weekly intervals. The standard
//! catalog lists two-day MW/TR blocks of 75 minutes first, then one-day
//! blocks of 170 minutes (evening slots before daytime ones); an instance
//! with `d` days and `p` periods uses the first `d × p` entries.
//!
//! Unavailability `(day, period)` is mapped row-major onto the same
//! sequence: `index = day × periods_per_day + period`. Entries that fall
//! past the active catalog are dropped.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{TimeInterval, TimetableProblem, Weekday};

const TWO_DAY_STARTS: [u32; 9] = [700, 830, 1000, 1130, 1300, 1430, 1600, 1730, 1900];
const TWO_DAY_STOPS: [u32; 9] = [815, 945, 1115, 1245, 1415, 1545, 1715, 1845, 2015];
const ONE_DAY_STARTS: [u32; 5] = [1600, 1900, 700, 1000, 1300];
const ONE_DAY_STOPS: [u32; 5] = [1850, 2150, 950, 1250, 1550];

/// An ordered list of candidate time intervals.
///
/// Order matters: the domain builder enumerates intervals in catalog
/// order, which decides which solution a deterministic search finds first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeslotCatalog {
    intervals: Vec<TimeInterval>,
}

impl TimeslotCatalog {
    /// Creates a catalog from explicit intervals.
    pub fn new(intervals: Vec<TimeInterval>) -> Self {
        Self { intervals }
    }

    /// The standard 43-entry catalog (18 two-day + 25 one-day intervals).
    pub fn standard() -> Self {
        use Weekday::*;

        let mut intervals = Vec::with_capacity(43);
        for days in [[Monday, Wednesday], [Tuesday, Thursday]] {
            for (start, stop) in TWO_DAY_STARTS.into_iter().zip(TWO_DAY_STOPS) {
                intervals.push(Self::fixed(days, start, stop));
            }
        }
        for day in [Monday, Tuesday, Wednesday, Thursday, Friday] {
            for (start, stop) in ONE_DAY_STARTS.into_iter().zip(ONE_DAY_STOPS) {
                intervals.push(Self::fixed([day], start, stop));
            }
        }
        Self { intervals }
    }

    // Constants above are well-formed; construction cannot fail.
    fn fixed<const N: usize>(days: [Weekday; N], start: u32, stop: u32) -> TimeInterval {
        match TimeInterval::new(days, start, stop) {
            Ok(iv) => iv,
            Err(e) => unreachable!("standard catalog entry: {e}"),
        }
    }

    /// The standard catalog truncated to a problem's `days × periods` grid.
    pub fn for_problem(problem: &TimetableProblem) -> Self {
        Self::standard().active(problem.period_count())
    }

    /// Keeps the first `count` intervals.
    pub fn active(mut self, count: usize) -> Self {
        if count > self.intervals.len() {
            warn!(
                "requested {count} intervals but catalog has only {}; using all",
                self.intervals.len()
            );
        }
        self.intervals.truncate(count);
        self
    }

    /// Intervals in catalog order.
    pub fn intervals(&self) -> &[TimeInterval] {
        &self.intervals
    }

    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Interval for an ITC `(day, period)` cell, if it is in the catalog.
    pub fn interval_for(&self, day: usize, period: usize, periods_per_day: usize) -> Option<&TimeInterval> {
        self.intervals.get(day * periods_per_day + period)
    }

    /// Maps each course's unavailability onto catalog intervals.
    ///
    /// Courses without unavailability are absent from the result.
    pub fn blocked_intervals(&self, problem: &TimetableProblem) -> BTreeMap<String, Vec<TimeInterval>> {
        let mut blocked = BTreeMap::new();
        for (course_id, cells) in &problem.unavailability {
            let mut list = Vec::with_capacity(cells.len());
            for cell in cells {
                match self.interval_for(cell.day, cell.period, problem.periods_per_day) {
                    Some(iv) => list.push(iv.clone()),
                    None => debug!(
                        "ignoring unavailability of {course_id} at day {} period {}: outside catalog",
                        cell.day, cell.period
                    ),
                }
            }
            blocked.insert(course_id.clone(), list);
        }
        blocked
    }
}
