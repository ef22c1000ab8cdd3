//! Instance difficulty estimate.
//!
//! Draws random complete timetables (each course gets a uniformly random
//! value from its static domain) and scores them with the verifier. The
//! mean score over many trials is a rough, negative "complexity": the more
//! negative, the more a random timetable collides.

use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::TimeslotCatalog;
use crate::csp::{create_rng, Assignment, CspModel};
use crate::error::Result;
use crate::models::TimetableProblem;
use crate::verify::verify;

/// Summary of random-assignment scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexityEstimate {
    /// Number of random timetables scored.
    pub trials: usize,
    /// Mean verifier score.
    pub mean: f64,
    /// Population standard deviation of the scores.
    pub std_dev: f64,
}

/// A complete assignment with one random value per course.
///
/// Returns `None` if some course has an empty domain.
pub fn random_assignment<R: Rng>(model: &mut CspModel, rng: &mut R) -> Option<Assignment> {
    let mut assignment = Assignment::new(model.num_variables());
    for var in 0..model.num_variables() {
        let domain = model.domain(var);
        if domain.is_empty() {
            return None;
        }
        let value = domain[rng.random_range(0..domain.len())];
        model.assign(var, value, &mut assignment);
    }
    Some(assignment)
}

/// Scores `trials` random timetables for `problem`.
///
/// With no trials, or when some course has an empty domain, mean and
/// standard deviation are both `0.0` and `trials` reports how many were
/// actually scored.
///
/// # Errors
/// Propagates [`StructuralInfeasibility`](crate::TimetableError::StructuralInfeasibility)
/// from model construction.
pub fn estimate_complexity(
    problem: &TimetableProblem,
    catalog: &TimeslotCatalog,
    trials: usize,
    seed: Option<u64>,
) -> Result<ComplexityEstimate> {
    let mut model = CspModel::from_problem(problem, catalog)?;
    let mut rng = create_rng(seed);

    let mut scores = Vec::with_capacity(trials);
    for _ in 0..trials {
        let Some(assignment) = random_assignment(&mut model, &mut rng) else {
            warn!("{}: a course has no values; complexity not estimated", problem.name);
            break;
        };
        let timetable = model.to_timetable(&assignment);
        scores.push(verify(problem, &timetable).score);
    }

    let estimate = summarize(&scores);
    info!(
        "{}: complexity mean {:.2}, std {:.2} over {} trials",
        problem.name, estimate.mean, estimate.std_dev, estimate.trials
    );
    Ok(estimate)
}

fn summarize(scores: &[f64]) -> ComplexityEstimate {
    if scores.is_empty() {
        return ComplexityEstimate {
            trials: 0,
            mean: 0.0,
            std_dev: 0.0,
        };
    }
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    ComplexityEstimate {
        trials: scores.len(),
        mean,
        std_dev: variance.sqrt(),
    }
}
