//! Depth-first backtracking search.
//!
//! # Algorithm
//!
//! ```text
//! backtrack(assignment):
//!     if every variable is bound: return assignment
//!     var = select-unassigned-variable
//!     for value in order-domain-values(var):
//!         if value conflicts with no bound variable:
//!             assign var = value
//!             removals = suppose(var, value)
//!             if inference(var, value) succeeds and backtrack() succeeds:
//!                 return assignment
//!             restore(removals)
//!     unassign var
//!     return failure
//! ```
//!
//! The first complete, conflict-free assignment is returned; there is no
//! optimisation. With deterministic strategies the same input always gives
//! the same result.
//!
//! # Reference
//! Russell & Norvig, *Artificial Intelligence: A Modern Approach*, §6.3.

use log::{info, trace};
use serde::{Deserialize, Serialize};

use super::{Assignment, CspModel, Inference, SearchConfig, ValueOrdering, VariableSelection};

/// How a search ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A complete assignment satisfying every constraint.
    Solved(Assignment),
    /// No solution found: the search space was exhausted, or a local
    /// search ran out of steps.
    Exhausted,
}

impl SearchOutcome {
    /// Whether a solution was found.
    pub fn is_solved(&self) -> bool {
        matches!(self, Self::Solved(_))
    }

    /// The solution, if any.
    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            Self::Solved(a) => Some(a),
            Self::Exhausted => None,
        }
    }

    /// Consumes the outcome, returning the solution if any.
    pub fn into_assignment(self) -> Option<Assignment> {
        match self {
            Self::Solved(a) => Some(a),
            Self::Exhausted => None,
        }
    }
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Search nodes visited (backtracking) or repair steps taken (local search).
    pub nodes: u64,
    /// Dead ends from which the search retreated.
    pub backtracks: u64,
    /// Variable bindings made.
    pub assignments: u64,
}

/// Outcome and statistics of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// How the search ended.
    pub outcome: SearchOutcome,
    /// Counters.
    pub stats: SearchStats,
}

/// A search algorithm over a [`CspModel`].
pub trait CspSolver {
    /// Searches for a complete conflict-free assignment.
    ///
    /// The model's live domains and assignment counter are updated as a
    /// side effect.
    fn search(&self, model: &mut CspModel) -> SearchResult;
}

/// Backtracking search with pluggable strategies.
///
/// # Example
/// ```
/// use u_timetable::catalog::TimeslotCatalog;
/// use u_timetable::csp::{BacktrackingSearch, CspModel, CspSolver};
/// use u_timetable::models::{Course, Room, TimetableProblem};
///
/// let problem = TimetableProblem::new("tiny", 1, 2)
///     .with_course(Course::new("c1"))
///     .with_course(Course::new("c2"))
///     .with_room(Room::new("A", 10));
/// let mut model = CspModel::from_problem(&problem, &TimeslotCatalog::for_problem(&problem)).unwrap();
///
/// let result = BacktrackingSearch::default().search(&mut model);
/// assert!(result.outcome.is_solved());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BacktrackingSearch {
    variable_selection: VariableSelection,
    value_ordering: ValueOrdering,
    inference: Inference,
}

impl BacktrackingSearch {
    pub fn new(variable_selection: VariableSelection, value_ordering: ValueOrdering, inference: Inference) -> Self {
        Self {
            variable_selection,
            value_ordering,
            inference,
        }
    }

    /// Takes strategies from a config.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.variable_selection, config.value_ordering, config.inference)
    }

    fn backtrack(&self, model: &mut CspModel, assignment: &mut Assignment, stats: &mut SearchStats) -> bool {
        stats.nodes += 1;
        let Some(var) = self.variable_selection.select(model, assignment) else {
            return true;
        };

        for value in self.value_ordering.order(model, var, assignment) {
            if model.conflict_count(var, value, assignment) != 0 {
                continue;
            }
            model.assign(var, value, assignment);
            trace!("depth {}: {} = {:?}", assignment.len(), model.variable_name(var), value);

            let mut removals = model.suppose(var, value);
            if self.inference.infer(model, var, value, assignment, &mut removals)
                && self.backtrack(model, assignment, stats)
            {
                return true;
            }
            model.restore(removals);
        }

        model.unassign(var, assignment);
        stats.backtracks += 1;
        trace!("backtrack from {}", model.variable_name(var));
        false
    }
}

impl CspSolver for BacktrackingSearch {
    /// Runs the search from an empty assignment.
    ///
    /// Live domains left over from a previous search are discarded first.
    fn search(&self, model: &mut CspModel) -> SearchResult {
        model.clear_pruning();
        let assigns_before = model.nassigns();
        info!(
            "backtracking over {} courses ({:?}, {:?}, {:?})",
            model.num_variables(),
            self.variable_selection,
            self.value_ordering,
            self.inference
        );

        let mut assignment = Assignment::new(model.num_variables());
        let mut stats = SearchStats::default();
        let solved = self.backtrack(model, &mut assignment, &mut stats);
        stats.assignments = model.nassigns() - assigns_before;

        info!(
            "backtracking {}: {} nodes, {} backtracks, {} assignments",
            if solved { "solved" } else { "exhausted" },
            stats.nodes,
            stats.backtracks,
            stats.assignments
        );

        let outcome = if solved {
            debug_assert!(model.goal_test(&assignment));
            SearchOutcome::Solved(assignment)
        } else {
            SearchOutcome::Exhausted
        };
        SearchResult { outcome, stats }
    }
}
