//! Pluggable search strategies.
//!
//! Three independent choices shape a backtracking search:
//!
//! | Choice | Plain | Informed |
//! |--------|-------|----------|
//! | Which variable next | [`FirstUnassigned`](VariableSelection::FirstUnassigned) | [`MinimumRemainingValues`](VariableSelection::MinimumRemainingValues) |
//! | Which value first | [`Unordered`](ValueOrdering::Unordered) | [`LeastConstraining`](ValueOrdering::LeastConstraining) |
//! | What to deduce after a choice | [`None`](Inference::None) | [`ForwardChecking`](Inference::ForwardChecking) |
//!
//! # Reference
//! Russell & Norvig, *Artificial Intelligence: A Modern Approach*, ch. 6.

use serde::{Deserialize, Serialize};

use super::{Assignment, CspModel, Removals, Value, VarId};

/// Variable-selection heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VariableSelection {
    /// Lowest-index unassigned variable.
    #[default]
    FirstUnassigned,
    /// Unassigned variable with the fewest legal values.
    ///
    /// With live domains the count is the live domain size; otherwise it is
    /// the number of values with no conflicts. Ties go to the lowest index.
    MinimumRemainingValues,
}

impl VariableSelection {
    /// Picks the next variable, or `None` if all are assigned.
    pub fn select(&self, model: &CspModel, assignment: &Assignment) -> Option<VarId> {
        match self {
            Self::FirstUnassigned => assignment.unassigned().next(),
            // min_by_key keeps the first minimum, i.e. the lowest index.
            Self::MinimumRemainingValues => assignment
                .unassigned()
                .min_by_key(|&var| legal_value_count(model, var, assignment)),
        }
    }
}

fn legal_value_count(model: &CspModel, var: VarId, assignment: &Assignment) -> usize {
    if model.is_pruning() {
        model.choices(var).len()
    } else {
        model
            .domain(var)
            .iter()
            .filter(|&&v| model.conflict_count(var, v, assignment) == 0)
            .count()
    }
}

/// Value-ordering heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValueOrdering {
    /// Live-domain order.
    #[default]
    Unordered,
    /// Values that rule out the fewest live values of unassigned neighbors
    /// come first. Ties keep live-domain order.
    LeastConstraining,
}

impl ValueOrdering {
    /// Candidate values for `var`, in trial order.
    pub fn order(&self, model: &CspModel, var: VarId, assignment: &Assignment) -> Vec<Value> {
        let mut values = model.choices(var).to_vec();
        if let Self::LeastConstraining = self {
            // sort_by_cached_key is stable and evaluates each key once
            values.sort_by_cached_key(|&value| ruled_out(model, var, value, assignment));
        }
        values
    }
}

fn ruled_out(model: &CspModel, var: VarId, value: Value, assignment: &Assignment) -> usize {
    assignment
        .unassigned()
        .filter(|&other| other != var)
        .map(|other| {
            model
                .choices(other)
                .iter()
                .filter(|&&ov| model.conflicts(var, value, other, ov))
                .count()
        })
        .sum()
}

/// Inference performed after tentatively binding a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Inference {
    /// No deduction.
    #[default]
    None,
    /// Remove from each unassigned neighbor's live domain every value that
    /// conflicts with the new binding.
    ForwardChecking,
}

impl Inference {
    /// Runs inference for `var = value`, appending prunes to `removals`.
    ///
    /// Returns `false` if some neighbor's live domain became empty. Prunes
    /// made before the wipe-out stay in `removals` for the caller to undo.
    pub fn infer(
        &self,
        model: &mut CspModel,
        var: VarId,
        value: Value,
        assignment: &Assignment,
        removals: &mut Removals,
    ) -> bool {
        match self {
            Self::None => true,
            Self::ForwardChecking => forward_check(model, var, value, assignment, removals),
        }
    }
}

fn forward_check(
    model: &mut CspModel,
    var: VarId,
    value: Value,
    assignment: &Assignment,
    removals: &mut Removals,
) -> bool {
    model.support_pruning();
    let neighbors: Vec<VarId> = model
        .neighbors(var)
        .filter(|&n| !assignment.is_assigned(n))
        .collect();

    for neighbor in neighbors {
        if model.prune_conflicting(var, value, neighbor, removals) == 0 {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TimeslotCatalog;
    use crate::models::{Course, Curriculum, Room, TimetableProblem};

    // Two non-overlapping slots, two rooms; c1 and c2 share a curriculum
    fn model() -> CspModel {
        let p = TimetableProblem::new("t", 1, 2)
            .with_course(Course::new("c1"))
            .with_course(Course::new("c2"))
            .with_course(Course::new("c3"))
            .with_room(Room::new("A", 10))
            .with_room(Room::new("B", 10))
            .with_curriculum(Curriculum::new("q").with_courses(["c1", "c2"]));
        CspModel::from_problem(&p, &TimeslotCatalog::for_problem(&p)).unwrap()
    }

    #[test]
    fn test_first_unassigned() {
        let mut m = model();
        let mut a = Assignment::new(3);
        assert_eq!(VariableSelection::FirstUnassigned.select(&m, &a), Some(0));
        m.assign(0, Value::new(0, 0), &mut a);
        assert_eq!(VariableSelection::FirstUnassigned.select(&m, &a), Some(1));
        m.assign(1, Value::new(0, 1), &mut a);
        m.assign(2, Value::new(1, 0), &mut a);
        assert_eq!(VariableSelection::FirstUnassigned.select(&m, &a), None);
    }

    #[test]
    fn test_mrv_counts_consistent_values() {
        let mut m = model();
        let mut a = Assignment::new(3);
        m.assign(0, Value::new(0, 0), &mut a);
        // c2 loses both slot-0 values (curriculum) and keeps 2; c3 loses (0,0) and keeps 3
        assert_eq!(
            VariableSelection::MinimumRemainingValues.select(&m, &a),
            Some(1)
        );
    }

    #[test]
    fn test_mrv_ties_lowest_index() {
        let m = model();
        let a = Assignment::new(3);
        assert_eq!(
            VariableSelection::MinimumRemainingValues.select(&m, &a),
            Some(0)
        );
    }

    #[test]
    fn test_mrv_uses_live_domains() {
        let mut m = model();
        let a = Assignment::new(3);
        m.support_pruning();
        let mut r = Removals::new();
        m.prune(2, Value::new(0, 0), &mut r);
        assert_eq!(
            VariableSelection::MinimumRemainingValues.select(&m, &a),
            Some(2)
        );
    }

    #[test]
    fn test_unordered_keeps_domain_order() {
        let m = model();
        let a = Assignment::new(3);
        assert_eq!(ValueOrdering::Unordered.order(&m, 0, &a), m.domain(0).to_vec());
    }

    #[test]
    fn test_lcv_is_a_permutation() {
        let m = model();
        let a = Assignment::new(3);
        let mut ordered = ValueOrdering::LeastConstraining.order(&m, 0, &a);
        let mut plain = m.domain(0).to_vec();
        ordered.sort();
        plain.sort();
        assert_eq!(ordered, plain);
    }

    #[test]
    fn test_lcv_prefers_less_constraining() {
        // c1 in slot 0 blocks c2's two slot-0 values and c3's one equal value
        // regardless of room, so every value rules out 3; order is unchanged
        let m = model();
        let a = Assignment::new(3);
        assert_eq!(
            ValueOrdering::LeastConstraining.order(&m, 0, &a),
            m.domain(0).to_vec()
        );

        // Remove c2's slot-1 values: values of c1 in slot 1 now rule out less
        let mut m = model();
        m.support_pruning();
        let mut r = Removals::new();
        m.prune(1, Value::new(0, 1), &mut r);
        m.prune(1, Value::new(1, 1), &mut r);
        let order = ValueOrdering::LeastConstraining.order(&m, 0, &a);
        assert_eq!(order, vec![Value::new(0, 1), Value::new(1, 1), Value::new(0, 0), Value::new(1, 0)]);
    }

    #[test]
    fn test_lcv_ignores_bound_neighbors() {
        // c3 holds (A, slot 0). Each c1 value rules out two of c2's values,
        // so the clash with c3 does not push (A, slot 0) back.
        let mut m = model();
        let mut a = Assignment::new(3);
        m.assign(2, Value::new(0, 0), &mut a);
        assert_eq!(m.conflict_count(0, Value::new(0, 0), &a), 1);
        assert_eq!(
            ValueOrdering::LeastConstraining.order(&m, 0, &a),
            m.domain(0).to_vec()
        );
    }

    #[test]
    fn test_forward_checking_prunes_and_restores() {
        let mut m = model();
        let mut a = Assignment::new(3);
        m.assign(0, Value::new(0, 0), &mut a);
        let mut r = Removals::new();
        assert!(Inference::ForwardChecking.infer(&mut m, 0, Value::new(0, 0), &a, &mut r));
        assert_eq!(m.choices(1), &[Value::new(0, 1), Value::new(1, 1)]);
        assert_eq!(m.choices(2).len(), 3);
        assert_eq!(r.len(), 3);

        m.restore(r);
        assert_eq!(m.choices(1).len(), 4);
        assert_eq!(m.choices(2), m.domain(2));
    }

    #[test]
    fn test_forward_checking_wipeout() {
        let mut m = model();
        let mut a = Assignment::new(3);
        m.support_pruning();
        let mut r = Removals::new();
        m.prune(1, Value::new(0, 1), &mut r);
        m.prune(1, Value::new(1, 1), &mut r);
        m.assign(0, Value::new(0, 0), &mut a);
        assert!(!Inference::ForwardChecking.infer(&mut m, 0, Value::new(0, 0), &a, &mut r));
        assert!(m.choices(1).is_empty());
        m.restore(r);
        assert_eq!(m.choices(1), m.domain(1));
    }

    #[test]
    fn test_no_inference() {
        let mut m = model();
        let a = Assignment::new(3);
        let mut r = Removals::new();
        assert!(Inference::None.infer(&mut m, 0, Value::new(0, 0), &a, &mut r));
        assert!(r.is_empty());
    }
}
