//! Course model.
//!
//! A course is one CSP variable: it must receive exactly one room and one
//! weekly time interval.

use serde::{Deserialize, Serialize};

/// A course to be timetabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Unique course code.
    pub id: String,
    /// Teacher identifier.
    pub teacher_id: String,
    /// Number of meetings (lectures) per week.
    pub meetings_per_week: u32,
    /// Minimum number of distinct working days the lectures spread over.
    pub min_working_days: u32,
    /// Maximum enrollment (number of students).
    pub max_enrollment: u32,
}

impl Course {
    /// Creates a course with one weekly meeting and no students.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            teacher_id: String::new(),
            meetings_per_week: 1,
            min_working_days: 1,
            max_enrollment: 0,
        }
    }

    /// Sets the teacher.
    pub fn with_teacher(mut self, teacher_id: impl Into<String>) -> Self {
        self.teacher_id = teacher_id.into();
        self
    }

    /// Sets meetings per week and minimum working days.
    pub fn with_meetings(mut self, meetings_per_week: u32, min_working_days: u32) -> Self {
        self.meetings_per_week = meetings_per_week;
        self.min_working_days = min_working_days;
        self
    }

    /// Sets the maximum enrollment.
    pub fn with_enrollment(mut self, max_enrollment: u32) -> Self {
        self.max_enrollment = max_enrollment;
        self
    }
}
