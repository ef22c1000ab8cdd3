//! Input validation for timetabling problems.
//!
//! Checks structural integrity of a [`TimetableProblem`] before solving.
//! Detects:
//! - Duplicate course, room and curriculum IDs
//! - Curricula or unavailability entries naming unknown courses
//! - Empty curricula
//! - A teaching grid with no periods
//!
//! Capacity shortfalls and unsatisfiable curricula are not input errors;
//! they surface as empty domains or an exhausted search.

use std::collections::HashSet;
use std::fmt;

use crate::models::TimetableProblem;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities of the same kind share an ID.
    DuplicateId,
    /// A curriculum or unavailability entry names a course that doesn't exist.
    UnknownCourseReference,
    /// A curriculum lists no courses.
    EmptyCurriculum,
    /// `num_days × periods_per_day` is zero.
    EmptyGrid,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

fn check_unique<'a>(
    kind: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {kind} ID: {id}"),
            ));
        }
    }
    seen
}

/// Validates a timetabling problem.
///
/// Checks:
/// 1. The grid has at least one period
/// 2. No duplicate course, room or curriculum IDs
/// 3. Every curriculum lists at least one course, all of them known
/// 4. Every unavailability entry names a known course
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_problem(problem: &TimetableProblem) -> ValidationResult {
    let mut errors = Vec::new();

    if problem.period_count() == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyGrid,
            format!(
                "Grid of {} days x {} periods has no slots",
                problem.num_days, problem.periods_per_day
            ),
        ));
    }

    let course_ids = check_unique("course", problem.courses.iter().map(|c| c.id.as_str()), &mut errors);
    check_unique("room", problem.rooms.iter().map(|r| r.id.as_str()), &mut errors);
    check_unique(
        "curriculum",
        problem.curricula.iter().map(|q| q.id.as_str()),
        &mut errors,
    );

    for curriculum in &problem.curricula {
        if curriculum.courses.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyCurriculum,
                format!("Curriculum '{}' has no courses", curriculum.id),
            ));
        }
        for course in &curriculum.courses {
            if !course_ids.contains(course.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownCourseReference,
                    format!(
                        "Curriculum '{}' references unknown course '{}'",
                        curriculum.id, course
                    ),
                ));
            }
        }
    }

    for course in problem.unavailability.keys() {
        if !course_ids.contains(course.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownCourseReference,
                format!("Unavailability references unknown course '{course}'"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Curriculum, Room};

    fn sample() -> TimetableProblem {
        TimetableProblem::new("p", 5, 4)
            .with_course(Course::new("c1"))
            .with_course(Course::new("c2"))
            .with_room(Room::new("A", 30))
            .with_curriculum(Curriculum::new("q").with_courses(["c1", "c2"]))
            .with_unavailability("c1", 0, 0)
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_problem(&sample()).is_ok());
    }

    #[test]
    fn test_duplicate_course_id() {
        let p = sample().with_course(Course::new("c1"));
        let errors = validate_problem(&p).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("course")));
    }

    #[test]
    fn test_duplicate_room_id() {
        let p = sample().with_room(Room::new("A", 10));
        let errors = validate_problem(&p).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("room")));
    }

    #[test]
    fn test_unknown_curriculum_member() {
        let p = sample().with_curriculum(Curriculum::new("r").with_course("ghost"));
        let errors = validate_problem(&p).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::UnknownCourseReference);
    }

    #[test]
    fn test_unknown_unavailability_course() {
        let p = sample().with_unavailability("ghost", 1, 1);
        let errors = validate_problem(&p).unwrap_err();
        assert!(errors[0].message.contains("ghost"));
    }

    #[test]
    fn test_empty_curriculum() {
        let p = sample().with_curriculum(Curriculum::new("empty"));
        let errors = validate_problem(&p).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyCurriculum);
    }

    #[test]
    fn test_multiple_errors() {
        let mut p = sample().with_curriculum(Curriculum::new("q").with_course("ghost"));
        p.num_days = 0;
        let errors = validate_problem(&p).unwrap_err();
        assert!(errors.len() >= 3);
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyGrid);
    }
}
