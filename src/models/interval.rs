//! Weekly time intervals.
//!
//! A [`TimeInterval`] is a set of weekdays plus a clock range, e.g.
//! `MW 07:00-08:15`. Times are integers on a 24h clock (`700` = 7:00,
//! `1545` = 15:45).
//!
//! # Overlap model
//! Two intervals overlap iff they share at least one weekday AND their
//! closed ranges `[start, stop]` intersect. Touching endpoints count as an
//! overlap: `M 0700-0815` and `M 0815-0945` collide. This is stricter than
//! the half-open convention and leaves no zero-minute gap between classes.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::TimetableError;

/// Day of the week, ordered Monday first.
///
/// Symbols follow the usual registrar convention: `R` is Thursday,
/// `U` is Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All days in week order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Single-letter symbol (`M T W R F S U`).
    pub fn symbol(self) -> char {
        match self {
            Weekday::Monday => 'M',
            Weekday::Tuesday => 'T',
            Weekday::Wednesday => 'W',
            Weekday::Thursday => 'R',
            Weekday::Friday => 'F',
            Weekday::Saturday => 'S',
            Weekday::Sunday => 'U',
        }
    }

    /// Parses a single-letter symbol.
    pub fn from_symbol(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.symbol() == c)
    }
}

/// A set of weekdays with a start and stop time.
///
/// Equality is structural. Ordering follows the canonical key
/// `(days string, start, stop)`, which gives deterministic sorting for
/// display and tie-breaking.
///
/// Deserialization goes through [`TimeInterval::new`], so an interval
/// with no days or with `start > stop` is rejected.
///
/// # Examples
///
/// ```
/// use u_timetable::models::TimeInterval;
///
/// let a: TimeInterval = "MW-0700-0815".parse().unwrap();
/// let b: TimeInterval = "M-0815-0945".parse().unwrap();
/// assert!(a.overlaps(&b)); // shared Monday, touching at 08:15
/// assert_eq!(a.to_string(), "MW-0700-0815");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IntervalFields")]
pub struct TimeInterval {
    days: BTreeSet<Weekday>,
    start: u32,
    stop: u32,
}

/// Unchecked wire form of [`TimeInterval`].
#[derive(Deserialize)]
struct IntervalFields {
    days: BTreeSet<Weekday>,
    start: u32,
    stop: u32,
}

impl TryFrom<IntervalFields> for TimeInterval {
    type Error = TimetableError;

    fn try_from(fields: IntervalFields) -> Result<Self, Self::Error> {
        Self::new(fields.days, fields.start, fields.stop)
    }
}

impl TimeInterval {
    /// Creates an interval.
    ///
    /// # Errors
    /// [`TimetableError::InvalidInterval`] if `days` is empty or `start > stop`.
    pub fn new(
        days: impl IntoIterator<Item = Weekday>,
        start: u32,
        stop: u32,
    ) -> Result<Self, TimetableError> {
        let days: BTreeSet<Weekday> = days.into_iter().collect();
        if days.is_empty() {
            return Err(TimetableError::InvalidInterval(format!(
                "no days for {start:04}-{stop:04}"
            )));
        }
        if start > stop {
            return Err(TimetableError::InvalidInterval(format!(
                "start {start:04} after stop {stop:04}"
            )));
        }
        Ok(Self { days, start, stop })
    }

    /// Days on which this interval meets.
    pub fn days(&self) -> &BTreeSet<Weekday> {
        &self.days
    }

    /// Start time (24h clock, e.g. `700`).
    #[inline]
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Stop time (24h clock, e.g. `815`).
    #[inline]
    pub fn stop(&self) -> u32 {
        self.stop
    }

    /// Days as a string in week order, e.g. `"MW"`.
    pub fn days_key(&self) -> String {
        self.days.iter().map(|d| d.symbol()).collect()
    }

    /// Whether this interval meets on `day`.
    pub fn meets_on(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }

    /// Whether two intervals collide.
    ///
    /// True iff they share a weekday and NOT (`other` stops before this
    /// starts OR `other` starts after this stops). Boundary contact counts.
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.days.is_disjoint(&other.days) {
            return false;
        }
        !(other.stop < self.start || other.start > self.stop)
    }
}

impl Ord for TimeInterval {
    fn cmp(&self, other: &Self) -> Ordering {
        self.days_key()
            .cmp(&other.days_key())
            .then(self.start.cmp(&other.start))
            .then(self.stop.cmp(&other.stop))
    }
}

impl PartialOrd for TimeInterval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:04}-{:04}", self.days_key(), self.start, self.stop)
    }
}

impl FromStr for TimeInterval {
    type Err = TimetableError;

    /// Parses the `DAYS-HHMM-HHMM` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TimetableError::InvalidInterval(s.to_string());

        let mut parts = s.split('-');
        let (Some(days), Some(start), Some(stop), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let days = days
            .chars()
            .map(Weekday::from_symbol)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;
        let start = start.parse().map_err(|_| invalid())?;
        let stop = stop.parse().map_err(|_| invalid())?;

        Self::new(days, start, stop)
    }
}
