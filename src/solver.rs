//! End-to-end timetable solving.
//!
//! # Pipeline
//!
//! 1. Validate the problem ([`validate_problem`]).
//! 2. Build the active catalog and the CSP model (fails fast on structural
//!    infeasibility).
//! 3. Run the configured search.
//! 4. Decode the assignment into a [`Timetable`] and verify it.

use log::{info, warn};
use std::time::Instant;

use crate::catalog::TimeslotCatalog;
use crate::csp::{
    Algorithm, BacktrackingSearch, CspModel, CspSolver, MinConflicts, SearchConfig, SearchStats,
};
use crate::error::{Result, TimetableError};
use crate::models::{Timetable, TimetableProblem};
use crate::validation::validate_problem;
use crate::verify::{verify, Verdict};

/// Result of solving one problem.
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// The timetable, if the search succeeded.
    pub timetable: Option<Timetable>,
    /// Verifier result for the timetable, if any.
    pub verdict: Option<Verdict>,
    /// Search counters.
    pub stats: SearchStats,
    /// Wall-clock solve time in milliseconds.
    pub solve_time_ms: u64,
}

impl SolveReport {
    /// Whether a timetable was found.
    pub fn is_solved(&self) -> bool {
        self.timetable.is_some()
    }
}

/// Solves timetabling problems with a fixed configuration.
///
/// # Example
///
/// ```
/// use u_timetable::models::{Course, Room, TimetableProblem};
/// use u_timetable::solver::TimetableSolver;
/// use u_timetable::csp::SearchConfig;
///
/// let problem = TimetableProblem::new("toy", 5, 4)
///     .with_course(Course::new("c1").with_enrollment(30))
///     .with_course(Course::new("c2").with_enrollment(30))
///     .with_room(Room::new("A", 50));
///
/// let report = TimetableSolver::new(SearchConfig::informed()).solve(&problem).unwrap();
/// assert!(report.is_solved());
/// assert!(report.verdict.unwrap().is_valid);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimetableSolver {
    config: SearchConfig,
}

impl TimetableSolver {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Solves over the standard catalog truncated to the problem's grid.
    pub fn solve(&self, problem: &TimetableProblem) -> Result<SolveReport> {
        self.solve_with_catalog(problem, &TimeslotCatalog::for_problem(problem))
    }

    /// Solves over an explicit catalog.
    ///
    /// # Errors
    /// - [`TimetableError::InvalidProblem`] if validation fails
    /// - [`TimetableError::StructuralInfeasibility`] if there are more
    ///   courses than room-interval slots
    pub fn solve_with_catalog(&self, problem: &TimetableProblem, catalog: &TimeslotCatalog) -> Result<SolveReport> {
        validate_problem(problem).map_err(TimetableError::InvalidProblem)?;

        let start = Instant::now();
        let mut model = CspModel::from_problem(problem, catalog)?.with_constraints(self.config.constraints.clone());
        info!(
            "solving {} with {:?}: {} courses, {} rooms, {} intervals",
            problem.name,
            self.config.algorithm,
            problem.course_count(),
            problem.rooms.len(),
            catalog.len()
        );

        let result = match self.config.algorithm {
            Algorithm::Backtracking => BacktrackingSearch::from_config(&self.config).search(&mut model),
            Algorithm::MinConflicts => MinConflicts::from_config(&self.config).search(&mut model),
        };

        let timetable = result
            .outcome
            .assignment()
            .map(|assignment| model.to_timetable(assignment));
        let verdict = timetable.as_ref().map(|t| verify(problem, t));
        let solve_time_ms = start.elapsed().as_millis() as u64;

        match &verdict {
            Some(v) if !v.is_valid => warn!(
                "{}: solution scores {} under the verifier ({} violations)",
                problem.name,
                v.score,
                v.violations.len()
            ),
            Some(_) => info!("{}: solved in {solve_time_ms} ms", problem.name),
            None => info!("{}: no solution found in {solve_time_ms} ms", problem.name),
        }

        Ok(SolveReport {
            timetable,
            verdict,
            stats: result.stats,
            solve_time_ms,
        })
    }
}
