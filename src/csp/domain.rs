//! Variable domains and the unary-constraint domain builder.
//!
//! Each course's domain is the Cartesian product of its room domain
//! (rooms large enough for its enrollment) and its time domain (catalog
//! intervals not blocked for it). The product is materialised up front.
//!
//! # Scalability
//! The product is `O(rooms × intervals)` per course. That is fine for two
//! attributes, but extending values with more attributes (teacher,
//! building, ...) multiplies domain size and should not reuse this scheme.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, TimetableError};
use crate::models::{Course, Room, TimeInterval};

/// Index of a CSP variable (a course, in problem order).
pub type VarId = usize;

/// A domain value: a room index and an interval index.
///
/// Indices refer to the problem's room list and the active catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Value {
    /// Index into the room list.
    pub room: usize,
    /// Index into the active interval catalog.
    pub slot: usize,
}

impl Value {
    pub fn new(room: usize, slot: usize) -> Self {
        Self { room, slot }
    }
}

/// Static per-variable domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domains {
    values: Vec<Vec<Value>>,
}

impl Domains {
    /// Wraps precomputed domains, one entry per variable.
    pub fn new(values: Vec<Vec<Value>>) -> Self {
        Self { values }
    }

    /// Domain of a variable.
    pub fn get(&self, var: VarId) -> &[Value] {
        &self.values[var]
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no variables.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Domain sizes in variable order.
    pub fn sizes(&self) -> Vec<usize> {
        self.values.iter().map(Vec::len).collect()
    }

    /// Iterates domains in variable order.
    pub fn iter(&self) -> impl Iterator<Item = &[Value]> {
        self.values.iter().map(Vec::as_slice)
    }

    pub(crate) fn to_vecs(&self) -> Vec<Vec<Value>> {
        self.values.clone()
    }
}

/// Builds domains from course, room and interval data.
///
/// # Ordering
/// Rooms form the outer loop and intervals the inner loop, both in input
/// order. With deterministic strategies this fixes the first solution found.
///
/// # Example
/// ```
/// use u_timetable::csp::DomainBuilder;
/// use u_timetable::models::{Course, Room, TimeInterval};
///
/// let courses = vec![Course::new("c1").with_enrollment(40)];
/// let rooms = vec![Room::new("small", 30), Room::new("big", 60)];
/// let intervals: Vec<TimeInterval> =
///     vec!["MW-0700-0815".parse().unwrap(), "TR-0700-0815".parse().unwrap()];
///
/// let domains = DomainBuilder::new(&courses, &rooms, &intervals).build().unwrap();
/// assert_eq!(domains.get(0).len(), 2); // only "big", both intervals
/// ```
pub struct DomainBuilder<'a> {
    courses: &'a [Course],
    rooms: &'a [Room],
    intervals: &'a [TimeInterval],
    blocked: Option<&'a BTreeMap<String, Vec<TimeInterval>>>,
}

impl<'a> DomainBuilder<'a> {
    /// Creates a builder with no blocked intervals.
    pub fn new(courses: &'a [Course], rooms: &'a [Room], intervals: &'a [TimeInterval]) -> Self {
        Self {
            courses,
            rooms,
            intervals,
            blocked: None,
        }
    }

    /// Sets blocked intervals per course id.
    pub fn with_blocked(mut self, blocked: &'a BTreeMap<String, Vec<TimeInterval>>) -> Self {
        self.blocked = Some(blocked);
        self
    }

    /// Computes all domains.
    ///
    /// # Errors
    /// [`TimetableError::StructuralInfeasibility`] if there are more courses
    /// than `rooms × intervals` slots.
    pub fn build(&self) -> Result<Domains> {
        let slots = self.rooms.len() * self.intervals.len();
        if self.courses.len() > slots {
            return Err(TimetableError::StructuralInfeasibility {
                courses: self.courses.len(),
                slots,
            });
        }

        let values: Vec<Vec<Value>> = self
            .courses
            .iter()
            .map(|course| self.domain_for(course))
            .collect();

        for (course, domain) in self.courses.iter().zip(&values) {
            if domain.is_empty() {
                warn!("course {} has an empty domain", course.id);
            }
        }
        debug!(
            "built domains for {} courses over {} rooms x {} intervals",
            self.courses.len(),
            self.rooms.len(),
            self.intervals.len()
        );

        Ok(Domains::new(values))
    }

    fn domain_for(&self, course: &Course) -> Vec<Value> {
        let blocked: &[TimeInterval] = self
            .blocked
            .and_then(|b| b.get(&course.id))
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let slots: Vec<usize> = self
            .intervals
            .iter()
            .enumerate()
            .filter(|(_, iv)| !blocked.contains(iv))
            .map(|(i, _)| i)
            .collect();

        let mut domain = Vec::new();
        for (r, room) in self.rooms.iter().enumerate() {
            if !room.fits(course.max_enrollment) {
                continue;
            }
            domain.extend(slots.iter().map(|&s| Value::new(r, s)));
        }
        domain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(s: &str) -> TimeInterval {
        s.parse().unwrap()
    }

    fn intervals() -> Vec<TimeInterval> {
        vec![iv("MW-0700-0815"), iv("MW-0830-0945"), iv("TR-0700-0815")]
    }

    #[test]
    fn test_room_outer_interval_inner() {
        let courses = vec![Course::new("c1").with_enrollment(10)];
        let rooms = vec![Room::new("A", 20), Room::new("B", 20)];
        let ivs = intervals();

        let d = DomainBuilder::new(&courses, &rooms, &ivs).build().unwrap();
        assert_eq!(
            d.get(0),
            &[
                Value::new(0, 0),
                Value::new(0, 1),
                Value::new(0, 2),
                Value::new(1, 0),
                Value::new(1, 1),
                Value::new(1, 2),
            ]
        );
    }

    #[test]
    fn test_capacity_filter() {
        let courses = vec![
            Course::new("small").with_enrollment(20),
            Course::new("large").with_enrollment(45),
        ];
        let rooms = vec![Room::new("A", 32), Room::new("B", 50)];
        let ivs = intervals();

        let d = DomainBuilder::new(&courses, &rooms, &ivs).build().unwrap();
        assert_eq!(d.sizes(), vec![6, 3]);
        assert!(d.get(1).iter().all(|v| v.room == 1));
    }

    #[test]
    fn test_blocked_uses_equality_not_overlap() {
        let courses = vec![Course::new("c1").with_enrollment(10)];
        let rooms = vec![Room::new("A", 20)];
        let ivs = intervals();
        let mut blocked = BTreeMap::new();
        // Overlaps MW-0700-0815 but is not equal to it
        blocked.insert("c1".to_string(), vec![iv("M-0700-0815"), iv("TR-0700-0815")]);

        let d = DomainBuilder::new(&courses, &rooms, &ivs)
            .with_blocked(&blocked)
            .build()
            .unwrap();
        assert_eq!(d.get(0), &[Value::new(0, 0), Value::new(0, 1)]);
    }

    #[test]
    fn test_structural_infeasibility() {
        let courses = vec![Course::new("c1"), Course::new("c2")];
        let rooms = vec![Room::new("A", 50)];
        let ivs = vec![iv("MW-0700-0815")];

        let err = DomainBuilder::new(&courses, &rooms, &ivs).build().unwrap_err();
        assert!(matches!(
            err,
            TimetableError::StructuralInfeasibility { courses: 2, slots: 1 }
        ));
    }

    #[test]
    fn test_empty_domain_is_not_an_error() {
        let courses = vec![Course::new("huge").with_enrollment(500)];
        let rooms = vec![Room::new("A", 50)];
        let ivs = intervals();

        let d = DomainBuilder::new(&courses, &rooms, &ivs).build().unwrap();
        assert!(d.get(0).is_empty());
    }

    #[test]
    fn test_domain_soundness() {
        let courses = vec![
            Course::new("a").with_enrollment(30),
            Course::new("b").with_enrollment(50),
        ];
        let rooms = vec![Room::new("R1", 30), Room::new("R2", 40), Room::new("R3", 60)];
        let ivs = intervals();
        let mut blocked = BTreeMap::new();
        blocked.insert("a".to_string(), vec![ivs[1].clone()]);

        let d = DomainBuilder::new(&courses, &rooms, &ivs)
            .with_blocked(&blocked)
            .build()
            .unwrap();

        for (course, domain) in courses.iter().zip(d.iter()) {
            let blocked_for = blocked.get(&course.id).cloned().unwrap_or_default();
            for v in domain {
                assert!(rooms[v.room].capacity >= course.max_enrollment);
                assert!(!blocked_for.contains(&ivs[v.slot]));
            }
        }
    }
}
