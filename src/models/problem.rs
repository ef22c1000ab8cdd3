//! Problem instance model.
//!
//! [`TimetableProblem`] is the data bundle handed to the solver: courses,
//! rooms, the teaching grid size, per-course unavailability, and curricula.
//! It mirrors the content of an ITC-2007 `.ctt` file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Course, Curriculum, Room, Unavailability};

/// A curriculum-based course timetabling instance.
///
/// # Examples
///
/// ```
/// use u_timetable::models::{Course, Curriculum, Room, TimetableProblem};
///
/// let problem = TimetableProblem::new("toy", 5, 4)
///     .with_course(Course::new("c1").with_enrollment(30))
///     .with_course(Course::new("c2").with_enrollment(30))
///     .with_room(Room::new("A", 50))
///     .with_curriculum(Curriculum::new("q1").with_courses(["c1", "c2"]));
///
/// assert_eq!(problem.course_count(), 2);
/// assert!(problem.shares_curriculum("c1", "c2"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableProblem {
    /// Instance name.
    pub name: String,
    /// Courses, in input order.
    pub courses: Vec<Course>,
    /// Rooms, in input order.
    pub rooms: Vec<Room>,
    /// Number of teaching days.
    pub num_days: usize,
    /// Periods per teaching day.
    pub periods_per_day: usize,
    /// Blocked periods per course id.
    pub unavailability: BTreeMap<String, Vec<Unavailability>>,
    /// Curricula, in input order.
    pub curricula: Vec<Curriculum>,
}

impl TimetableProblem {
    /// Creates an empty instance with the given teaching grid.
    pub fn new(name: impl Into<String>, num_days: usize, periods_per_day: usize) -> Self {
        Self {
            name: name.into(),
            courses: Vec::new(),
            rooms: Vec::new(),
            num_days,
            periods_per_day,
            unavailability: BTreeMap::new(),
            curricula: Vec::new(),
        }
    }

    /// Adds a course.
    pub fn with_course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Adds a curriculum.
    pub fn with_curriculum(mut self, curriculum: Curriculum) -> Self {
        self.curricula.push(curriculum);
        self
    }

    /// Blocks `(day, period)` for a course.
    pub fn with_unavailability(mut self, course_id: impl Into<String>, day: usize, period: usize) -> Self {
        self.add_unavailability(course_id, day, period);
        self
    }

    /// Blocks `(day, period)` for a course.
    pub fn add_unavailability(&mut self, course_id: impl Into<String>, day: usize, period: usize) {
        self.unavailability
            .entry(course_id.into())
            .or_default()
            .push(Unavailability::new(day, period));
    }

    /// Number of courses.
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Number of `(day, period)` cells in the teaching grid.
    pub fn period_count(&self) -> usize {
        self.num_days * self.periods_per_day
    }

    /// Finds a course by id.
    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    /// Position of a course in [`courses`](Self::courses).
    pub fn course_index(&self, id: &str) -> Option<usize> {
        self.courses.iter().position(|c| c.id == id)
    }

    /// Finds a room by id.
    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Blocked periods for a course (empty if none).
    pub fn unavailability_for(&self, course_id: &str) -> &[Unavailability] {
        self.unavailability
            .get(course_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether two courses appear together in at least one curriculum.
    pub fn shares_curriculum(&self, a: &str, b: &str) -> bool {
        self.curricula
            .iter()
            .any(|cur| cur.contains(a) && cur.contains(b))
    }
}
