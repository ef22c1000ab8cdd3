//! Min-conflicts local search.
//!
//! Starts from a greedy complete assignment, then repeatedly picks a random
//! conflicted course and moves it to the value with the fewest conflicts.
//! Fast on loosely constrained instances, but incomplete: it can fail on
//! solvable problems and never proves infeasibility.
//!
//! # Reference
//! Minton et al. (1992), "Minimizing conflicts: a heuristic repair method
//! for constraint satisfaction and scheduling problems".

use log::{debug, info, warn};
use rand::Rng;

use super::{
    create_rng, Assignment, CspModel, CspSolver, SearchConfig, SearchOutcome, SearchResult, SearchStats,
    Value, VarId,
};

/// Min-conflicts repair search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinConflicts {
    max_steps: usize,
    seed: Option<u64>,
}

impl MinConflicts {
    /// Creates a search with the given step limit and optional seed.
    pub fn new(max_steps: usize, seed: Option<u64>) -> Self {
        Self { max_steps, seed }
    }

    /// Takes the step limit and seed from a config.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.max_steps, config.seed)
    }

    /// Value for `var` with the fewest conflicts, ties broken at random.
    ///
    /// Returns `None` for an empty domain.
    fn min_conflicts_value<R: Rng>(
        model: &CspModel,
        var: VarId,
        assignment: &Assignment,
        rng: &mut R,
    ) -> Option<Value> {
        let mut best = usize::MAX;
        let mut candidates: Vec<Value> = Vec::new();
        for &value in model.domain(var) {
            let n = model.conflict_count(var, value, assignment);
            if n < best {
                best = n;
                candidates.clear();
            }
            if n == best {
                candidates.push(value);
            }
        }
        if candidates.is_empty() {
            None
        } else {
            Some(candidates[rng.random_range(0..candidates.len())])
        }
    }
}

impl CspSolver for MinConflicts {
    fn search(&self, model: &mut CspModel) -> SearchResult {
        let mut rng = create_rng(self.seed);
        let assigns_before = model.nassigns();
        let mut stats = SearchStats::default();
        let mut assignment = Assignment::new(model.num_variables());
        info!(
            "min-conflicts over {} courses, max {} steps",
            model.num_variables(),
            self.max_steps
        );

        for var in 0..model.num_variables() {
            match Self::min_conflicts_value(model, var, &assignment, &mut rng) {
                Some(value) => model.assign(var, value, &mut assignment),
                None => {
                    warn!("min-conflicts: {} has no values", model.variable_name(var));
                    stats.assignments = model.nassigns() - assigns_before;
                    return SearchResult {
                        outcome: SearchOutcome::Exhausted,
                        stats,
                    };
                }
            }
        }

        let solved = loop {
            let conflicted = model.conflicted_vars(&assignment);
            if conflicted.is_empty() {
                break true;
            }
            if stats.nodes >= self.max_steps as u64 {
                break false;
            }
            stats.nodes += 1;
            let var = conflicted[rng.random_range(0..conflicted.len())];
            if let Some(value) = Self::min_conflicts_value(model, var, &assignment, &mut rng) {
                model.assign(var, value, &mut assignment);
            }
        };
        stats.assignments = model.nassigns() - assigns_before;

        debug!("min-conflicts took {} repair steps", stats.nodes);
        info!("min-conflicts {}", if solved { "solved" } else { "gave up" });

        let outcome = if solved {
            SearchOutcome::Solved(assignment)
        } else {
            SearchOutcome::Exhausted
        };
        SearchResult { outcome, stats }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TimeslotCatalog;
    use crate::models::{Course, Curriculum, Room, TimetableProblem};

    fn model_for(problem: &TimetableProblem) -> CspModel {
        CspModel::from_problem(problem, &TimeslotCatalog::for_problem(problem)).unwrap()
    }

    fn loose() -> TimetableProblem {
        let mut p = TimetableProblem::new("loose", 5, 4)
            .with_room(Room::new("A", 50))
            .with_room(Room::new("B", 50));
        for i in 0..8 {
            p = p.with_course(Course::new(format!("c{i}")).with_enrollment(20));
        }
        p.with_curriculum(Curriculum::new("q").with_courses(["c0", "c1", "c2", "c3"]))
    }

    #[test]
    fn test_solves_loose_instance() {
        let p = loose();
        let mut m = model_for(&p);
        let result = MinConflicts::new(1000, Some(42)).search(&mut m);
        let a = result.outcome.assignment().expect("loose instance is easy");
        assert!(m.goal_test(a));
        assert!(result.stats.assignments >= 8);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let p = loose();
        let mut m1 = model_for(&p);
        let mut m2 = model_for(&p);
        let r1 = MinConflicts::new(1000, Some(7)).search(&mut m1);
        let r2 = MinConflicts::new(1000, Some(7)).search(&mut m2);
        assert_eq!(r1, r2);
    }

    #[test]
    fn test_gives_up_on_infeasible() {
        let p = TimetableProblem::new("t", 1, 2)
            .with_course(Course::new("c1"))
            .with_course(Course::new("c2"))
            .with_course(Course::new("c3"))
            .with_room(Room::new("A", 10))
            .with_room(Room::new("B", 10))
            .with_curriculum(Curriculum::new("q").with_courses(["c1", "c2", "c3"]));
        let mut m = model_for(&p);
        let result = MinConflicts::new(50, Some(1)).search(&mut m);
        assert_eq!(result.outcome, SearchOutcome::Exhausted);
        assert_eq!(result.stats.nodes, 50);
    }

    #[test]
    fn test_empty_domain() {
        let p = TimetableProblem::new("t", 1, 2)
            .with_course(Course::new("big").with_enrollment(99))
            .with_room(Room::new("A", 10));
        let mut m = model_for(&p);
        let result = MinConflicts::new(10, Some(1)).search(&mut m);
        assert!(!result.outcome.is_solved());
    }
}
