//! Constraint satisfaction engine for course timetabling.
//!
//! Courses are variables, `(room, interval)` pairs are values, and every
//! pair of courses is linked by a binary constraint set.
//!
//! # Components
//!
//! - [`DomainBuilder`]: unary filtering (room capacity, unavailability)
//! - [`TimetableConstraint`]: binary predicates
//! - [`CspModel`]: assignment bookkeeping, conflict counting, and
//!   reversible domain pruning
//! - [`BacktrackingSearch`]: complete search with pluggable
//!   [`VariableSelection`], [`ValueOrdering`] and [`Inference`]
//! - [`MinConflicts`]: local repair search
//!
//! # Reference
//! Russell & Norvig, *Artificial Intelligence: A Modern Approach*, ch. 6.

mod assignment;
mod config;
mod constraint;
mod domain;
mod min_conflicts;
mod model;
mod search;
mod strategy;

pub use assignment::{Assignment, Removal, Removals};
pub use config::{Algorithm, SearchConfig};
pub use constraint::{all_satisfied, ConstraintContext, TimetableConstraint};
pub use domain::{DomainBuilder, Domains, Value, VarId};
pub use min_conflicts::MinConflicts;
pub use model::CspModel;
pub use search::{BacktrackingSearch, CspSolver, SearchOutcome, SearchResult, SearchStats};
pub use strategy::{Inference, ValueOrdering, VariableSelection};

use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Seeded RNG, or an entropy-seeded one when `seed` is `None`.
pub(crate) fn create_rng(seed: Option<u64>) -> SmallRng {
    SmallRng::seed_from_u64(seed.unwrap_or_else(rand::random))
}
