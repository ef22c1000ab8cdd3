//! The timetabling CSP.
//!
//! Variables are courses, values are `(room, interval)` pairs, and every
//! pair of distinct courses is linked by the active constraint set.
//!
//! # Live domains
//! Search may narrow domains while exploring. Narrowing is recorded in a
//! [`Removals`] log and undone with [`CspModel::restore`]. Live domains are
//! created lazily by [`CspModel::support_pruning`]; until then
//! [`CspModel::choices`] returns the static domains.

use log::trace;

use super::{
    all_satisfied, Assignment, ConstraintContext, DomainBuilder, Domains, Removal, Removals,
    TimetableConstraint, Value, VarId,
};
use crate::catalog::TimeslotCatalog;
use crate::error::Result;
use crate::models::{TimeInterval, Timetable, TimetableProblem};

/// A course-timetabling constraint satisfaction problem.
#[derive(Debug, Clone)]
pub struct CspModel {
    variables: Vec<String>,
    rooms: Vec<String>,
    intervals: Vec<TimeInterval>,
    domains: Domains,
    constraints: Vec<TimetableConstraint>,
    context: ConstraintContext,
    curr_domains: Option<Vec<Vec<Value>>>,
    nassigns: u64,
}

impl CspModel {
    /// Assembles a model from prepared parts.
    ///
    /// `variables` and `domains` are parallel; value indices refer to
    /// `rooms` and `intervals`.
    pub fn new(
        variables: Vec<String>,
        rooms: Vec<String>,
        intervals: Vec<TimeInterval>,
        domains: Domains,
        context: ConstraintContext,
    ) -> Self {
        Self {
            variables,
            rooms,
            intervals,
            domains,
            constraints: TimetableConstraint::ALL.to_vec(),
            context,
            curr_domains: None,
            nassigns: 0,
        }
    }

    /// Builds the model for a problem over a catalog.
    ///
    /// # Errors
    /// [`StructuralInfeasibility`](crate::TimetableError::StructuralInfeasibility)
    /// when the problem has more courses than room-interval slots.
    pub fn from_problem(problem: &TimetableProblem, catalog: &TimeslotCatalog) -> Result<Self> {
        let blocked = catalog.blocked_intervals(problem);
        let domains = DomainBuilder::new(&problem.courses, &problem.rooms, catalog.intervals())
            .with_blocked(&blocked)
            .build()?;

        let variables: Vec<String> = problem.courses.iter().map(|c| c.id.clone()).collect();
        let rooms = problem.rooms.iter().map(|r| r.id.clone()).collect();
        let context = ConstraintContext::new(catalog.intervals(), &variables, &problem.curricula);

        Ok(Self::new(
            variables,
            rooms,
            catalog.intervals().to_vec(),
            domains,
            context,
        ))
    }

    /// Replaces the active constraint set.
    pub fn with_constraints(mut self, constraints: Vec<TimetableConstraint>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Number of variables.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Course id of a variable.
    pub fn variable_name(&self, var: VarId) -> &str {
        &self.variables[var]
    }

    /// Static domain of a variable.
    pub fn domain(&self, var: VarId) -> &[Value] {
        self.domains.get(var)
    }

    /// All static domains.
    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    /// Active constraints.
    pub fn constraints(&self) -> &[TimetableConstraint] {
        &self.constraints
    }

    /// Every other variable.
    pub fn neighbors(&self, var: VarId) -> impl Iterator<Item = VarId> {
        (0..self.variables.len()).filter(move |&v| v != var)
    }

    /// Number of `assign` calls so far.
    pub fn nassigns(&self) -> u64 {
        self.nassigns
    }

    /// Binds `var` to `value`, replacing any previous binding.
    pub fn assign(&mut self, var: VarId, value: Value, assignment: &mut Assignment) {
        assignment.bind(var, value);
        self.nassigns += 1;
    }

    /// Removes the binding of `var`, if any.
    pub fn unassign(&self, var: VarId, assignment: &mut Assignment) {
        assignment.unbind(var);
    }

    /// Whether `(a = va, b = vb)` violates any active constraint.
    pub fn conflicts(&self, a: VarId, va: Value, b: VarId, vb: Value) -> bool {
        !all_satisfied(&self.constraints, &self.context, a, va, b, vb)
    }

    /// Number of assigned neighbors whose values conflict with `var = value`.
    pub fn conflict_count(&self, var: VarId, value: Value, assignment: &Assignment) -> usize {
        assignment
            .iter()
            .filter(|&(other, other_value)| other != var && self.conflicts(var, value, other, other_value))
            .count()
    }

    /// Assigned variables that conflict with at least one other.
    pub fn conflicted_vars(&self, assignment: &Assignment) -> Vec<VarId> {
        assignment
            .iter()
            .filter(|&(var, value)| self.conflict_count(var, value, assignment) > 0)
            .map(|(var, _)| var)
            .collect()
    }

    /// Whether live domains are being tracked.
    pub fn is_pruning(&self) -> bool {
        self.curr_domains.is_some()
    }

    /// Starts tracking live domains as copies of the static ones.
    ///
    /// No-op if already tracking.
    pub fn support_pruning(&mut self) {
        if self.curr_domains.is_none() {
            self.curr_domains = Some(self.domains.to_vecs());
        }
    }

    /// Stops tracking live domains.
    pub fn clear_pruning(&mut self) {
        self.curr_domains = None;
    }

    /// Live domain of `var` (the static domain if not tracking).
    pub fn choices(&self, var: VarId) -> &[Value] {
        match &self.curr_domains {
            Some(curr) => &curr[var],
            None => self.domains.get(var),
        }
    }

    /// Restricts `var`'s live domain to `value`, returning what was removed.
    pub fn suppose(&mut self, var: VarId, value: Value) -> Removals {
        self.support_pruning();
        let mut removals = Removals::new();
        if let Some(curr) = self.curr_domains.as_mut() {
            let domain = &mut curr[var];
            debug_assert!(domain.contains(&value));
            for position in (0..domain.len()).rev() {
                if domain[position] != value {
                    let removed = domain.remove(position);
                    removals.push(Removal {
                        var,
                        value: removed,
                        position,
                    });
                }
            }
        }
        removals
    }

    /// Removes `value` from `var`'s live domain, logging it in `removals`.
    ///
    /// Returns `false` if the value was not present. Requires
    /// [`support_pruning`](Self::support_pruning).
    pub fn prune(&mut self, var: VarId, value: Value, removals: &mut Removals) -> bool {
        let Some(curr) = self.curr_domains.as_mut() else {
            return false;
        };
        match curr[var].iter().position(|&v| v == value) {
            Some(position) => {
                curr[var].remove(position);
                removals.push(Removal { var, value, position });
                true
            }
            None => false,
        }
    }

    /// Removes from `neighbor`'s live domain every value that conflicts
    /// with `var = value`. Returns the number of values left.
    pub(crate) fn prune_conflicting(
        &mut self,
        var: VarId,
        value: Value,
        neighbor: VarId,
        removals: &mut Removals,
    ) -> usize {
        let Some(curr) = self.curr_domains.as_mut() else {
            return self.domains.get(neighbor).len();
        };
        let domain = &mut curr[neighbor];
        for position in (0..domain.len()).rev() {
            let nv = domain[position];
            if !all_satisfied(&self.constraints, &self.context, var, value, neighbor, nv) {
                domain.remove(position);
                removals.push(Removal {
                    var: neighbor,
                    value: nv,
                    position,
                });
            }
        }
        domain.len()
    }

    /// Undoes a removal log, returning live domains to their prior contents
    /// and order.
    pub fn restore(&mut self, removals: Removals) {
        let Some(curr) = self.curr_domains.as_mut() else {
            return;
        };
        let entries = removals.into_entries();
        trace!("restoring {} pruned values", entries.len());
        for r in entries.into_iter().rev() {
            curr[r.var].insert(r.position, r.value);
        }
    }

    /// Whether `assignment` is complete and conflict-free.
    pub fn goal_test(&self, assignment: &Assignment) -> bool {
        assignment.is_complete()
            && assignment
                .iter()
                .all(|(var, value)| self.conflict_count(var, value, assignment) == 0)
    }

    /// Room id and interval a value stands for.
    pub fn decode(&self, value: Value) -> (&str, &TimeInterval) {
        (self.rooms[value.room].as_str(), &self.intervals[value.slot])
    }

    /// Converts the bound part of an assignment into a timetable.
    pub fn to_timetable(&self, assignment: &Assignment) -> Timetable {
        let mut timetable = Timetable::new();
        for (var, value) in assignment.iter() {
            let (room, interval) = self.decode(value);
            timetable.place(self.variables[var].clone(), room, interval.clone());
        }
        timetable
    }
}
