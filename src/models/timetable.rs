//! Timetable (solution) model.
//!
//! A timetable maps each course to a room and a weekly time interval. It
//! may be partial or contain conflicts: the solver produces complete,
//! conflict-free timetables, but random or hand-written ones are scored by
//! the verifier as-is.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::TimeInterval;

/// A course's room and time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    /// Assigned room.
    pub room_id: String,
    /// Assigned time interval.
    pub interval: TimeInterval,
}

impl Placement {
    pub fn new(room_id: impl Into<String>, interval: TimeInterval) -> Self {
        Self {
            room_id: room_id.into(),
            interval,
        }
    }
}

/// Course → placement mapping, ordered by course id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    placements: BTreeMap<String, Placement>,
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a course, returning its previous placement if any.
    pub fn place(
        &mut self,
        course_id: impl Into<String>,
        room_id: impl Into<String>,
        interval: TimeInterval,
    ) -> Option<Placement> {
        self.placements
            .insert(course_id.into(), Placement::new(room_id, interval))
    }

    /// Builder form of [`place`](Self::place).
    pub fn with_placement(
        mut self,
        course_id: impl Into<String>,
        room_id: impl Into<String>,
        interval: TimeInterval,
    ) -> Self {
        self.place(course_id, room_id, interval);
        self
    }

    /// Removes a course's placement.
    pub fn remove(&mut self, course_id: &str) -> Option<Placement> {
        self.placements.remove(course_id)
    }

    /// Placement for a course.
    pub fn get(&self, course_id: &str) -> Option<&Placement> {
        self.placements.get(course_id)
    }

    /// Number of placed courses.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Whether no course is placed.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Iterates `(course_id, placement)` in course-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Placement)> {
        self.placements.iter().map(|(c, p)| (c.as_str(), p))
    }

    /// Placements in a given room, in course-id order.
    pub fn placements_in_room<'a>(
        &'a self,
        room_id: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a Placement)> + 'a {
        self.iter().filter(move |(_, p)| p.room_id == room_id)
    }

    /// Entries sorted by (interval, room, course), the order used when
    /// listing a timetable slot by slot.
    pub fn by_interval(&self) -> Vec<(&TimeInterval, &str, &str)> {
        let mut rows: Vec<_> = self
            .iter()
            .map(|(c, p)| (&p.interval, p.room_id.as_str(), c))
            .collect();
        rows.sort();
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(s: &str) -> TimeInterval {
        s.parse().unwrap()
    }

    fn sample() -> Timetable {
        Timetable::new()
            .with_placement("c2", "A", iv("TR-0700-0815"))
            .with_placement("c1", "B", iv("MW-0700-0815"))
            .with_placement("c3", "A", iv("MW-0830-0945"))
    }

    #[test]
    fn test_place_and_get() {
        let mut t = sample();
        assert_eq!(t.len(), 3);
        assert_eq!(t.get("c1").unwrap().room_id, "B");

        let prev = t.place("c1", "A", iv("F-0700-0950"));
        assert_eq!(prev.unwrap().room_id, "B");
        assert_eq!(t.len(), 3);

        assert!(t.remove("c1").is_some());
        assert!(t.get("c1").is_none());
    }

    #[test]
    fn test_placements_in_room() {
        let t = sample();
        let a: Vec<&str> = t.placements_in_room("A").map(|(c, _)| c).collect();
        assert_eq!(a, vec!["c2", "c3"]);
    }

    #[test]
    fn test_by_interval() {
        let t = sample();
        let courses: Vec<&str> = t.by_interval().into_iter().map(|(_, _, c)| c).collect();
        assert_eq!(courses, vec!["c1", "c3", "c2"]);
    }

    #[test]
    fn test_serde_json() {
        let t = sample();
        let json = serde_json::to_string(&t).unwrap();
        let back: Timetable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);

        // An interval with no days would never overlap anything
        let bad = json.replacen(r#"["Tuesday","Thursday"]"#, "[]", 1);
        assert_ne!(bad, json);
        assert!(serde_json::from_str::<Timetable>(&bad).is_err());
    }

    #[test]
    fn test_empty() {
        let t = Timetable::new();
        assert!(t.is_empty());
        assert_eq!(t.by_interval().len(), 0);
    }
}
