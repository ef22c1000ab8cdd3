//! Solution verification and scoring.
//!
//! Re-derives constraint violations from the raw problem and a candidate
//! timetable, independently of the CSP engine. The timetable may come from
//! the solver, a random generator, or a file.
//!
//! # Scoring
//!
//! Penalties accumulate into a non-positive score; `0.0` is a valid
//! timetable. Checks run in order:
//!
//! 1. **Completeness**: every course placed, nothing extra. Failure returns
//!    [`HARD_FAIL_SCORE`] immediately.
//! 2. **Capacity**: enrollment above room capacity costs
//!    [`HARD_CONSTRAINT_PENALTY`] per course.
//! 3. **Room exclusivity**: per room, each group of placements with the
//!    *same* interval costs `(size - 1) × HARD_CONSTRAINT_PENALTY`.
//! 4. **Curriculum**: each pair of curriculum courses in the same room with
//!    overlapping intervals costs [`SOFT_CONSTRAINT_PENALTY`].
//!
//! Unavailability is not re-checked.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{TimeInterval, Timetable, TimetableProblem};

/// Penalty per hard-constraint violation.
pub const HARD_CONSTRAINT_PENALTY: f64 = 1.0;

/// Penalty per soft-constraint violation.
pub const SOFT_CONSTRAINT_PENALTY: f64 = 0.5;

/// Score of a timetable that does not place every course exactly once.
pub const HARD_FAIL_SCORE: f64 = -1.0e6;

/// Type of verification finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationType {
    /// A course has no placement.
    MissingCourse,
    /// Placement count differs from course count.
    CountMismatch,
    /// A placement names a room that does not exist.
    UnknownRoom,
    /// Enrollment exceeds room capacity.
    CapacityExceeded,
    /// Several courses share a room and an interval.
    RoomDoubleBooked,
    /// Curriculum courses overlap in the same room.
    CurriculumOverlap,
}

/// A single verification finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Related entity ID (course or room).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
    /// Amount subtracted from the score.
    pub penalty: f64,
}

impl Violation {
    fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
        penalty: f64,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
            penalty,
        }
    }

    /// Creates a missing-course violation.
    pub fn missing_course(course_id: impl Into<String>) -> Self {
        let id = course_id.into();
        let message = format!("course {id} is not placed");
        Self::new(ViolationType::MissingCourse, id, message, -HARD_FAIL_SCORE)
    }

    /// Creates a count-mismatch violation.
    pub fn count_mismatch(placed: usize, expected: usize) -> Self {
        Self::new(
            ViolationType::CountMismatch,
            "",
            format!("{placed} placements for {expected} courses"),
            -HARD_FAIL_SCORE,
        )
    }

    /// Creates an unknown-room violation.
    pub fn unknown_room(course_id: impl Into<String>, room_id: &str) -> Self {
        let id = course_id.into();
        let message = format!("course {id} is placed in unknown room {room_id}");
        Self::new(ViolationType::UnknownRoom, id, message, -HARD_FAIL_SCORE)
    }

    /// Creates a capacity violation.
    pub fn capacity_exceeded(course_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::CapacityExceeded, course_id, message, HARD_CONSTRAINT_PENALTY)
    }

    /// Creates a double-booking violation covering `extra` surplus courses.
    pub fn room_double_booked(room_id: impl Into<String>, message: impl Into<String>, extra: usize) -> Self {
        Self::new(
            ViolationType::RoomDoubleBooked,
            room_id,
            message,
            HARD_CONSTRAINT_PENALTY * extra as f64,
        )
    }

    /// Creates a curriculum overlap violation.
    pub fn curriculum_overlap(curriculum_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::CurriculumOverlap, curriculum_id, message, SOFT_CONSTRAINT_PENALTY)
    }

    /// Whether this violation breaks a hard constraint.
    pub fn is_hard(&self) -> bool {
        !matches!(self.violation_type, ViolationType::CurriculumOverlap)
    }
}

/// Result of verifying a timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether no penalty was incurred.
    pub is_valid: bool,
    /// Total score: `0.0` when valid, negative otherwise.
    pub score: f64,
    /// Findings, in check order.
    pub violations: Vec<Violation>,
}

impl Verdict {
    fn hard_fail(violation: Violation) -> Self {
        Self {
            is_valid: false,
            score: HARD_FAIL_SCORE,
            violations: vec![violation],
        }
    }

    /// Minimisation fitness: `-score`, so `0.0` is best.
    pub fn fitness(&self) -> f64 {
        -self.score
    }

    /// Number of hard-constraint findings.
    pub fn hard_violation_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_hard()).count()
    }
}

/// Verifies and scores a timetable against a problem.
///
/// # Example
/// ```
/// use u_timetable::models::{Course, Room, Timetable, TimetableProblem};
/// use u_timetable::verify::verify;
///
/// let problem = TimetableProblem::new("p", 5, 4)
///     .with_course(Course::new("c1").with_enrollment(30))
///     .with_room(Room::new("A", 50));
/// let timetable = Timetable::new().with_placement("c1", "A", "MW-0700-0815".parse().unwrap());
///
/// let verdict = verify(&problem, &timetable);
/// assert!(verdict.is_valid);
/// assert_eq!(verdict.score, 0.0);
/// ```
pub fn verify(problem: &TimetableProblem, timetable: &Timetable) -> Verdict {
    for course in &problem.courses {
        if timetable.get(&course.id).is_none() {
            debug!("verify: {} missing", course.id);
            return Verdict::hard_fail(Violation::missing_course(&course.id));
        }
    }
    if timetable.len() != problem.course_count() {
        debug!(
            "verify: {} placements for {} courses",
            timetable.len(),
            problem.course_count()
        );
        return Verdict::hard_fail(Violation::count_mismatch(timetable.len(), problem.course_count()));
    }

    let mut violations = Vec::new();

    for course in &problem.courses {
        let Some(placement) = timetable.get(&course.id) else {
            continue;
        };
        let Some(room) = problem.room(&placement.room_id) else {
            return Verdict::hard_fail(Violation::unknown_room(&course.id, &placement.room_id));
        };
        if !room.fits(course.max_enrollment) {
            violations.push(Violation::capacity_exceeded(
                &course.id,
                format!(
                    "{} students in room {} with {} seats",
                    course.max_enrollment, room.id, room.capacity
                ),
            ));
        }
    }

    let mut by_slot: BTreeMap<(&str, &TimeInterval), Vec<&str>> = BTreeMap::new();
    for (course_id, placement) in timetable.iter() {
        by_slot
            .entry((placement.room_id.as_str(), &placement.interval))
            .or_default()
            .push(course_id);
    }
    for ((room_id, interval), courses) in &by_slot {
        if courses.len() > 1 {
            violations.push(Violation::room_double_booked(
                *room_id,
                format!("{} at {interval}: {}", room_id, courses.join(", ")),
                courses.len() - 1,
            ));
        }
    }

    for curriculum in &problem.curricula {
        for (i, a) in curriculum.courses.iter().enumerate() {
            for b in &curriculum.courses[i + 1..] {
                let (Some(pa), Some(pb)) = (timetable.get(a), timetable.get(b)) else {
                    continue;
                };
                if pa.room_id != pb.room_id || !pa.interval.overlaps(&pb.interval) {
                    continue;
                }
                violations.push(Violation::curriculum_overlap(
                    &curriculum.id,
                    format!("{a} and {b} overlap in room {}", pa.room_id),
                ));
            }
        }
    }

    let score = 0.0 - violations.iter().map(|v| v.penalty).sum::<f64>();
    debug!("verify: score {score} with {} violations", violations.len());

    Verdict {
        is_valid: violations.is_empty(),
        score,
        violations,
    }
}

/// Minimisation fitness of a timetable: `-score` of its verdict.
pub fn fitness(problem: &TimetableProblem, timetable: &Timetable) -> f64 {
    verify(problem, timetable).fitness()
}

/// Percentage of a wanted timetable reproduced by another.
///
/// Each course in `wanted` earns one point if `actual` places it in the same
/// room and interval, half a point if `actual` places it elsewhere, and
/// nothing if `actual` omits it. Courses only in `actual` are ignored. An
/// empty `wanted` gives `100.0`.
pub fn agreement(wanted: &Timetable, actual: &Timetable) -> f64 {
    if wanted.is_empty() {
        return 100.0;
    }
    let points: f64 = wanted
        .iter()
        .map(|(course, placement)| match actual.get(course) {
            Some(p) if p == placement => 1.0,
            Some(_) => 0.5,
            None => 0.0,
        })
        .sum();
    points / wanted.len() as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Curriculum, Room};

    fn iv(s: &str) -> TimeInterval {
        s.parse().unwrap()
    }

    fn problem() -> TimetableProblem {
        TimetableProblem::new("p", 5, 4)
            .with_course(Course::new("c1").with_enrollment(30))
            .with_course(Course::new("c2").with_enrollment(30))
            .with_course(Course::new("c3").with_enrollment(60))
            .with_room(Room::new("A", 50))
            .with_room(Room::new("B", 80))
            .with_curriculum(Curriculum::new("q").with_courses(["c1", "c2"]))
    }

    #[test]
    fn test_valid() {
        let t = Timetable::new()
            .with_placement("c1", "A", iv("MW-0700-0815"))
            .with_placement("c2", "A", iv("MW-0830-0945"))
            .with_placement("c3", "B", iv("MW-0700-0815"));
        let v = verify(&problem(), &t);
        assert!(v.is_valid);
        assert_eq!(v.score, 0.0);
        assert_eq!(v.fitness(), 0.0);
        assert!(v.violations.is_empty());
    }

    #[test]
    fn test_missing_course_is_hard_fail() {
        let t = Timetable::new()
            .with_placement("c1", "A", iv("MW-0700-0815"))
            .with_placement("c3", "B", iv("MW-0700-0815"));
        let v = verify(&problem(), &t);
        assert!(!v.is_valid);
        assert_eq!(v.score, HARD_FAIL_SCORE);
        assert_eq!(v.violations[0].violation_type, ViolationType::MissingCourse);
        assert_eq!(v.violations[0].entity_id, "c2");
        assert!(HARD_FAIL_SCORE < 0.0);
        assert_eq!(v.fitness(), 1.0e6);
    }

    #[test]
    fn test_extra_placement_is_hard_fail() {
        let t = Timetable::new()
            .with_placement("c1", "A", iv("MW-0700-0815"))
            .with_placement("c2", "A", iv("MW-0830-0945"))
            .with_placement("c3", "B", iv("MW-0700-0815"))
            .with_placement("ghost", "B", iv("TR-0700-0815"));
        let v = verify(&problem(), &t);
        assert_eq!(v.score, HARD_FAIL_SCORE);
        assert_eq!(v.violations[0].violation_type, ViolationType::CountMismatch);
    }

    #[test]
    fn test_unknown_room_is_hard_fail() {
        let t = Timetable::new()
            .with_placement("c1", "Z", iv("MW-0700-0815"))
            .with_placement("c2", "A", iv("MW-0830-0945"))
            .with_placement("c3", "B", iv("MW-0700-0815"));
        let v = verify(&problem(), &t);
        assert_eq!(v.score, HARD_FAIL_SCORE);
        assert_eq!(v.violations[0].violation_type, ViolationType::UnknownRoom);
    }

    #[test]
    fn test_capacity_penalty() {
        let t = Timetable::new()
            .with_placement("c1", "A", iv("MW-0700-0815"))
            .with_placement("c2", "A", iv("MW-0830-0945"))
            .with_placement("c3", "A", iv("TR-0700-0815"));
        let v = verify(&problem(), &t);
        assert!(!v.is_valid);
        assert_eq!(v.score, -HARD_CONSTRAINT_PENALTY);
        assert_eq!(v.violations[0].violation_type, ViolationType::CapacityExceeded);
        assert_eq!(v.hard_violation_count(), 1);
    }

    #[test]
    fn test_double_booking_counts_extras() {
        let p = problem().with_course(Course::new("c4"));
        let t = Timetable::new()
            .with_placement("c1", "B", iv("TR-0700-0815"))
            .with_placement("c3", "B", iv("MW-0700-0815"))
            .with_placement("c2", "B", iv("MW-0700-0815"))
            .with_placement("c4", "B", iv("MW-0700-0815"));
        let v = verify(&p, &t);
        assert_eq!(v.score, -2.0);
        assert_eq!(v.violations.len(), 1);
        assert_eq!(v.violations[0].entity_id, "B");
    }

    #[test]
    fn test_exclusivity_uses_equality() {
        // Overlapping but unequal intervals in one room are not double-booked
        let t = Timetable::new()
            .with_placement("c1", "A", iv("MW-0700-0815"))
            .with_placement("c2", "B", iv("TR-0700-0815"))
            .with_placement("c3", "B", iv("T-0700-0950"));
        let v = verify(&problem(), &t);
        assert!(v.is_valid);
    }

    #[test]
    fn test_curriculum_same_room_overlap() {
        let t = Timetable::new()
            .with_placement("c1", "A", iv("MW-0700-0815"))
            .with_placement("c2", "A", iv("M-0700-0950"))
            .with_placement("c3", "B", iv("MW-0700-0815"));
        let v = verify(&problem(), &t);
        assert!(!v.is_valid);
        assert_eq!(v.score, -SOFT_CONSTRAINT_PENALTY);
        assert_eq!(v.violations[0].violation_type, ViolationType::CurriculumOverlap);
        assert_eq!(v.hard_violation_count(), 0);
    }

    #[test]
    fn test_curriculum_different_room_is_exempt() {
        let t = Timetable::new()
            .with_placement("c1", "A", iv("MW-0700-0815"))
            .with_placement("c2", "B", iv("MW-0700-0815"))
            .with_placement("c3", "B", iv("TR-0700-0815"));
        assert!(verify(&problem(), &t).is_valid);
    }

    #[test]
    fn test_same_room_and_interval_in_curriculum() {
        let t = Timetable::new()
            .with_placement("c1", "A", iv("MW-0700-0815"))
            .with_placement("c2", "A", iv("MW-0700-0815"))
            .with_placement("c3", "B", iv("TR-0700-0815"));
        let v = verify(&problem(), &t);
        assert_eq!(v.score, -(HARD_CONSTRAINT_PENALTY + SOFT_CONSTRAINT_PENALTY));
        assert_eq!(fitness(&problem(), &t), 1.5);
    }

    #[test]
    fn test_agreement() {
        let wanted = Timetable::new()
            .with_placement("cs", "A", iv("MW-0700-0815"))
            .with_placement("bus", "A", iv("MW-0830-0945"))
            .with_placement("tec", "B", iv("MW-1000-1115"))
            .with_placement("mus", "L", iv("TR-1000-1115"));
        let actual = Timetable::new()
            .with_placement("bus", "A", iv("MW-0830-0945"))
            .with_placement("tec", "B", iv("MW-1000-1115"))
            .with_placement("cs", "C", iv("TR-0800-0915"))
            .with_placement("mus", "L", iv("TR-1000-1115"));
        assert_eq!(agreement(&wanted, &actual), 87.5);

        let mut partial = actual.clone();
        partial.remove("mus");
        assert_eq!(agreement(&wanted, &partial), 62.5);
        assert_eq!(agreement(&Timetable::new(), &actual), 100.0);
    }

    #[test]
    fn test_verdict_serde() {
        let t = Timetable::new();
        let v = verify(&problem(), &t);
        let json = serde_json::to_string(&v).unwrap();
        let back: Verdict = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
