//! Context search: Latin-hypercube global pass, pattern-search refinement
//! and the conservative seeded controller.

pub mod adaptive;
pub mod bounds;
pub mod global;
pub mod lhs;
pub mod local;
pub mod objective;

use pmc_core::constants::DIMENSIONS;
use pmc_core::types::SearchCandidate;
use rayon::prelude::*;

pub use adaptive::{AdaptiveController, AdaptiveOutcome};
pub use bounds::SearchBounds;
pub use global::{GlobalOutcome, GlobalSearch, SeedPoint};
pub use local::{LocalOutcome, LocalRefiner};
pub use objective::{Evaluation, Leash, Objective};

/// Scored batch in input order.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    pub candidates: Vec<SearchCandidate>,
    pub divergence_rejections: usize,
}

/// Score `points` as indices `offset..offset + points.len()`.
///
/// Each evaluation is a pure function of its point and index, so the
/// parallel and sequential paths return identical batches.
pub fn evaluate_batch(
    objective: &Objective<'_>,
    points: &[[f64; DIMENSIONS]],
    offset: usize,
    parallel: bool,
) -> Batch {
    let evaluations: Vec<Evaluation> = if parallel {
        points
            .par_iter()
            .enumerate()
            .map(|(i, p)| objective.evaluate(p, offset + i))
            .collect()
    } else {
        points
            .iter()
            .enumerate()
            .map(|(i, p)| objective.evaluate(p, offset + i))
            .collect()
    };

    let divergence_rejections = evaluations.iter().filter(|e| e.rejected_by_divergence).count();
    Batch {
        candidates: evaluations.into_iter().map(|e| e.candidate).collect(),
        divergence_rejections,
    }
}
