//! Binary constraint predicates.
//!
//! Every pair of distinct courses is related by the same predicate set.
//! A pair `(a = va, b = vb)` is compatible when each active constraint
//! accepts it.
//!
//! # Precomputation
//! Interval overlap and curriculum co-membership are looked up many times
//! per search node, so [`ConstraintContext`] stores both as dense boolean
//! matrices indexed by slot and variable respectively.

use serde::{Deserialize, Serialize};

use super::{Value, VarId};
use crate::models::{Curriculum, TimeInterval};

/// A binary predicate between two course assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimetableConstraint {
    /// Two courses in the same room must not have overlapping intervals.
    DifferentAssignment,
    /// If both courses belong to a common curriculum, their intervals must
    /// not overlap. Unrelated pairs are always compatible.
    DifferentTimeslotInCurriculum,
}

impl TimetableConstraint {
    /// The standard predicate set, in evaluation order.
    pub const ALL: [TimetableConstraint; 2] = [
        TimetableConstraint::DifferentAssignment,
        TimetableConstraint::DifferentTimeslotInCurriculum,
    ];

    /// Whether `(a = va, b = vb)` satisfies this constraint.
    pub fn is_satisfied(&self, ctx: &ConstraintContext, a: VarId, va: Value, b: VarId, vb: Value) -> bool {
        match self {
            Self::DifferentAssignment => va.room != vb.room || !ctx.slots_overlap(va.slot, vb.slot),
            Self::DifferentTimeslotInCurriculum => {
                !(ctx.shares_curriculum(a, b) && ctx.slots_overlap(va.slot, vb.slot))
            }
        }
    }
}

/// Whether a pair satisfies every constraint in `constraints`.
pub fn all_satisfied(
    constraints: &[TimetableConstraint],
    ctx: &ConstraintContext,
    a: VarId,
    va: Value,
    b: VarId,
    vb: Value,
) -> bool {
    constraints.iter().all(|c| c.is_satisfied(ctx, a, va, b, vb))
}

/// Lookup tables shared by all constraint evaluations.
///
/// Deserialization checks that both tables are square in their dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContextFields")]
pub struct ConstraintContext {
    n_slots: usize,
    n_vars: usize,
    overlap: Vec<bool>,
    shared: Vec<bool>,
}

#[derive(Deserialize)]
struct ContextFields {
    n_slots: usize,
    n_vars: usize,
    overlap: Vec<bool>,
    shared: Vec<bool>,
}

impl TryFrom<ContextFields> for ConstraintContext {
    type Error = String;

    fn try_from(f: ContextFields) -> Result<Self, Self::Error> {
        let tables = [
            ("overlap", f.n_slots, f.overlap.len()),
            ("shared", f.n_vars, f.shared.len()),
        ];
        for (name, n, len) in tables {
            if n.checked_mul(n) != Some(len) {
                return Err(format!("{name} table has {len} entries, expected {n}x{n}"));
            }
        }
        Ok(Self {
            n_slots: f.n_slots,
            n_vars: f.n_vars,
            overlap: f.overlap,
            shared: f.shared,
        })
    }
}

impl ConstraintContext {
    /// Builds overlap and co-membership tables.
    ///
    /// `course_ids` gives the variable order. Curriculum entries naming a
    /// course outside `course_ids` are ignored.
    pub fn new(intervals: &[TimeInterval], course_ids: &[String], curricula: &[Curriculum]) -> Self {
        let n_slots = intervals.len();
        let n_vars = course_ids.len();

        let mut overlap = vec![false; n_slots * n_slots];
        for (i, a) in intervals.iter().enumerate() {
            for (j, b) in intervals.iter().enumerate() {
                overlap[i * n_slots + j] = a.overlaps(b);
            }
        }

        let mut shared = vec![false; n_vars * n_vars];
        for curriculum in curricula {
            let members: Vec<usize> = course_ids
                .iter()
                .enumerate()
                .filter(|(_, id)| curriculum.contains(id))
                .map(|(i, _)| i)
                .collect();
            for &i in &members {
                for &j in &members {
                    if i != j {
                        shared[i * n_vars + j] = true;
                    }
                }
            }
        }

        Self {
            n_slots,
            n_vars,
            overlap,
            shared,
        }
    }

    /// Whether catalog slots `i` and `j` overlap.
    pub fn slots_overlap(&self, i: usize, j: usize) -> bool {
        self.overlap[i * self.n_slots + j]
    }

    /// Whether two variables appear together in some curriculum.
    pub fn shares_curriculum(&self, a: VarId, b: VarId) -> bool {
        self.shared[a * self.n_vars + b]
    }

    /// Number of slots covered.
    pub fn slot_count(&self) -> usize {
        self.n_slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(s: &str) -> TimeInterval {
        s.parse().unwrap()
    }

    fn ctx() -> ConstraintContext {
        let intervals = vec![iv("MW-0700-0815"), iv("M-0700-0950"), iv("TR-0700-0815")];
        let ids: Vec<String> = ["c1", "c2", "c3"].iter().map(|s| s.to_string()).collect();
        let curricula = vec![Curriculum::new("q").with_courses(["c1", "c2"])];
        ConstraintContext::new(&intervals, &ids, &curricula)
    }

    #[test]
    fn test_tables() {
        let c = ctx();
        assert!(c.slots_overlap(0, 1));
        assert!(c.slots_overlap(1, 0));
        assert!(!c.slots_overlap(0, 2));
        assert!(c.slots_overlap(2, 2));
        assert!(c.shares_curriculum(0, 1));
        assert!(c.shares_curriculum(1, 0));
        assert!(!c.shares_curriculum(0, 2));
        assert!(!c.shares_curriculum(0, 0));
    }

    #[test]
    fn test_serde_checks_table_sizes() {
        let c = ctx();
        let json = serde_json::to_string(&c).unwrap();
        let back: ConstraintContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);

        let short = r#"{"n_slots":2,"n_vars":1,"overlap":[true,false,true],"shared":[false]}"#;
        let err = serde_json::from_str::<ConstraintContext>(short).unwrap_err();
        assert!(err.to_string().contains("overlap table has 3 entries"));

        let shared = r#"{"n_slots":1,"n_vars":2,"overlap":[true],"shared":[]}"#;
        assert!(serde_json::from_str::<ConstraintContext>(shared).is_err());
    }

    #[test]
    fn test_different_assignment() {
        let c = ctx();
        let k = TimetableConstraint::DifferentAssignment;
        assert!(!k.is_satisfied(&c, 0, Value::new(0, 0), 2, Value::new(0, 0)));
        assert!(k.is_satisfied(&c, 0, Value::new(0, 0), 2, Value::new(1, 0)));
        // Overlapping intervals in one room clash even when unequal
        assert!(!k.is_satisfied(&c, 0, Value::new(0, 0), 2, Value::new(0, 1)));
        assert!(k.is_satisfied(&c, 0, Value::new(0, 0), 2, Value::new(0, 2)));
    }

    #[test]
    fn test_different_timeslot_in_curriculum() {
        let c = ctx();
        let k = TimetableConstraint::DifferentTimeslotInCurriculum;
        // c1, c2 share a curriculum: overlapping intervals fail, even in different rooms
        assert!(!k.is_satisfied(&c, 0, Value::new(0, 0), 1, Value::new(1, 1)));
        assert!(k.is_satisfied(&c, 0, Value::new(0, 0), 1, Value::new(0, 2)));
        // c1, c3 do not
        assert!(k.is_satisfied(&c, 0, Value::new(0, 0), 2, Value::new(1, 0)));
    }

    #[test]
    fn test_all_satisfied() {
        let c = ctx();
        let all = TimetableConstraint::ALL;
        assert!(!all_satisfied(&all, &c, 0, Value::new(0, 0), 2, Value::new(0, 0)));
        assert!(all_satisfied(&all, &c, 0, Value::new(0, 0), 2, Value::new(1, 0)));
        assert!(all_satisfied(&[], &c, 0, Value::new(0, 0), 1, Value::new(0, 0)));
    }
}
