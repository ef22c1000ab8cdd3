//! Search configuration.
//!
//! [`SearchConfig`] selects the algorithm, the backtracking strategies and
//! the constraint set used by [`TimetableSolver`](crate::solver::TimetableSolver).

use serde::{Deserialize, Serialize};

use super::{Inference, TimetableConstraint, ValueOrdering, VariableSelection};

/// Which search algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Algorithm {
    /// Complete depth-first backtracking.
    #[default]
    Backtracking,
    /// Local search by min-conflicts repair. Incomplete: may fail on
    /// solvable problems.
    MinConflicts,
}

/// Configuration for a timetable search.
///
/// # Defaults
///
/// ```
/// use u_timetable::csp::{Inference, SearchConfig, VariableSelection};
///
/// let config = SearchConfig::default();
/// assert_eq!(config.variable_selection, VariableSelection::FirstUnassigned);
/// assert_eq!(config.inference, Inference::None);
/// assert_eq!(config.constraints.len(), 2);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::csp::{Inference, SearchConfig, ValueOrdering, VariableSelection};
///
/// let config = SearchConfig::default()
///     .with_variable_selection(VariableSelection::MinimumRemainingValues)
///     .with_value_ordering(ValueOrdering::LeastConstraining)
///     .with_inference(Inference::ForwardChecking);
/// assert_eq!(config, SearchConfig::informed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search algorithm.
    pub algorithm: Algorithm,

    /// Variable-selection heuristic (backtracking only).
    pub variable_selection: VariableSelection,

    /// Value-ordering heuristic (backtracking only).
    pub value_ordering: ValueOrdering,

    /// Inference after each tentative binding (backtracking only).
    pub inference: Inference,

    /// Active binary constraints.
    pub constraints: Vec<TimetableConstraint>,

    /// Random seed for min-conflicts tie-breaking and random assignments.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Repair steps before min-conflicts gives up.
    pub max_steps: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            variable_selection: VariableSelection::default(),
            value_ordering: ValueOrdering::default(),
            inference: Inference::default(),
            constraints: TimetableConstraint::ALL.to_vec(),
            seed: None,
            max_steps: 100_000,
        }
    }
}

impl SearchConfig {
    /// Sets the algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the variable-selection heuristic.
    pub fn with_variable_selection(mut self, selection: VariableSelection) -> Self {
        self.variable_selection = selection;
        self
    }

    /// Sets the value-ordering heuristic.
    pub fn with_value_ordering(mut self, ordering: ValueOrdering) -> Self {
        self.value_ordering = ordering;
        self
    }

    /// Sets the inference method.
    pub fn with_inference(mut self, inference: Inference) -> Self {
        self.inference = inference;
        self
    }

    /// Replaces the constraint set.
    pub fn with_constraints(mut self, constraints: Vec<TimetableConstraint>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the min-conflicts step limit.
    pub fn with_max_steps(mut self, steps: usize) -> Self {
        self.max_steps = steps;
        self
    }

    /// Preset: backtracking with MRV, LCV and forward checking.
    pub fn informed() -> Self {
        Self {
            variable_selection: VariableSelection::MinimumRemainingValues,
            value_ordering: ValueOrdering::LeastConstraining,
            inference: Inference::ForwardChecking,
            ..Self::default()
        }
    }

    /// Preset: min-conflicts local search.
    pub fn min_conflicts(max_steps: usize) -> Self {
        Self {
            algorithm: Algorithm::MinConflicts,
            max_steps,
            ..Self::default()
        }
    }
}
