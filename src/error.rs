//! Error types.
//!
//! Only conditions that abort an operation are errors. A search that finds
//! no solution returns [`SearchOutcome::Exhausted`](crate::csp::SearchOutcome),
//! and a bad candidate timetable is reported through a
//! [`Verdict`](crate::verify::Verdict).

use thiserror::Error;

use crate::validation::ValidationError;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TimetableError>;

/// Errors raised while building or reading a timetabling problem.
#[derive(Debug, Error)]
pub enum TimetableError {
    /// More courses than room × interval slots: no complete assignment can exist.
    #[error("too many courses for the available room-time slots: {courses} courses, {slots} slots")]
    StructuralInfeasibility {
        /// Number of courses to place.
        courses: usize,
        /// Number of `(room, interval)` slots (`rooms × intervals`).
        slots: usize,
    },

    /// A time interval with no days or with `start > stop`.
    #[error("invalid time interval: {0}")]
    InvalidInterval(String),

    /// The problem failed input validation.
    #[error("invalid problem: {}", format_issues(.0))]
    InvalidProblem(Vec<ValidationError>),

    /// Malformed ITC-2007 input.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Failure reading a problem file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TimetableError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

fn format_issues(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
