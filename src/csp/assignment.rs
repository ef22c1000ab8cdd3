//! Partial assignments and the domain-pruning undo log.

use serde::{Deserialize, Serialize};

use super::{Value, VarId};

/// A partial mapping from variables to values.
///
/// Remembers the order in which variables were bound, so the most recent
/// binding can be undone. Deserialization rejects a bind order that does
/// not list each bound variable exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AssignmentFields")]
pub struct Assignment {
    values: Vec<Option<Value>>,
    order: Vec<VarId>,
}

#[derive(Deserialize)]
struct AssignmentFields {
    values: Vec<Option<Value>>,
    order: Vec<VarId>,
}

impl TryFrom<AssignmentFields> for Assignment {
    type Error = String;

    fn try_from(fields: AssignmentFields) -> Result<Self, Self::Error> {
        let AssignmentFields { values, order } = fields;
        let mut seen = vec![false; values.len()];
        for &var in &order {
            match values.get(var) {
                Some(Some(_)) if !seen[var] => seen[var] = true,
                Some(Some(_)) => return Err(format!("variable {var} listed twice in bind order")),
                _ => return Err(format!("variable {var} in bind order is not bound")),
            }
        }
        let bound = values.iter().filter(|v| v.is_some()).count();
        if bound != order.len() {
            return Err(format!("{bound} bound variables but {} in bind order", order.len()));
        }
        Ok(Self { values, order })
    }
}

impl Assignment {
    /// An empty assignment over `num_variables` variables.
    pub fn new(num_variables: usize) -> Self {
        Self {
            values: vec![None; num_variables],
            order: Vec::with_capacity(num_variables),
        }
    }

    /// Value bound to `var`, if any.
    pub fn get(&self, var: VarId) -> Option<Value> {
        self.values.get(var).copied().flatten()
    }

    /// Whether `var` is bound.
    pub fn is_assigned(&self, var: VarId) -> bool {
        self.get(var).is_some()
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of variables (bound or not).
    pub fn num_variables(&self) -> usize {
        self.values.len()
    }

    /// Whether every variable is bound.
    pub fn is_complete(&self) -> bool {
        self.order.len() == self.values.len()
    }

    /// Most recently bound variable.
    pub fn last_assigned(&self) -> Option<VarId> {
        self.order.last().copied()
    }

    /// Bound `(var, value)` pairs in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (VarId, Value)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(var, v)| v.map(|v| (var, v)))
    }

    /// Unbound variables in index order.
    pub fn unassigned(&self) -> impl Iterator<Item = VarId> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_none())
            .map(|(var, _)| var)
    }

    // Rebinding moves the variable to the top of the order.
    pub(crate) fn bind(&mut self, var: VarId, value: Value) {
        if self.values[var].is_some() {
            self.order.retain(|&v| v != var);
        }
        self.values[var] = Some(value);
        self.order.push(var);
    }

    pub(crate) fn unbind(&mut self, var: VarId) -> Option<Value> {
        let old = self.values.get_mut(var)?.take();
        if old.is_some() {
            if let Some(pos) = self.order.iter().rposition(|&v| v == var) {
                self.order.remove(pos);
            }
        }
        old
    }
}

/// One value pruned from a live domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removal {
    /// Variable whose domain shrank.
    pub var: VarId,
    /// Value removed.
    pub value: Value,
    /// Index the value occupied at removal time.
    pub position: usize,
}

/// Undo log of pruned values, in removal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removals {
    entries: Vec<Removal>,
}

impl Removals {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, removal: Removal) {
        self.entries.push(removal);
    }

    /// Appends another log after this one.
    pub fn extend(&mut self, other: Removals) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in removal order.
    pub fn iter(&self) -> impl Iterator<Item = &Removal> {
        self.entries.iter()
    }

    pub(crate) fn into_entries(self) -> Vec<Removal> {
        self.entries
    }
}
