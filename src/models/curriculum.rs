//! Curricula and unavailability constraints.

use serde::{Deserialize, Serialize};

/// A named group of courses that share students.
///
/// Courses in the same curriculum must not be taught at overlapping times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curriculum {
    /// Curriculum name.
    pub id: String,
    /// Member course codes, in input order.
    pub courses: Vec<String>,
}

impl Curriculum {
    /// Creates an empty curriculum.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            courses: Vec::new(),
        }
    }

    /// Adds a member course.
    pub fn with_course(mut self, course_id: impl Into<String>) -> Self {
        self.courses.push(course_id.into());
        self
    }

    /// Sets all member courses.
    pub fn with_courses<I, S>(mut self, course_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.courses = course_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `course_id` belongs to this curriculum.
    pub fn contains(&self, course_id: &str) -> bool {
        self.courses.iter().any(|c| c == course_id)
    }
}

/// A period in which a course may not be taught.
///
/// Uses ITC-2007 coordinates: zero-based day and zero-based period within
/// the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unavailability {
    /// Day index (0 = first teaching day).
    pub day: usize,
    /// Period index within the day.
    pub period: usize,
}

impl Unavailability {
    pub fn new(day: usize, period: usize) -> Self {
        Self { day, period }
    }
}
