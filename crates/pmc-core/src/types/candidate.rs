//! A scored point of the context search space.

use serde::{Deserialize, Serialize};

use super::ContextVector;
use crate::constants::DIMENSIONS;

/// One evaluated search point. Compared only by score within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCandidate {
    /// Position in the evaluation batch; breaks score ties.
    pub index: usize,
    /// Unit search coordinates actually evaluated (after any anchoring).
    pub unit: [f64; DIMENSIONS],
    pub vector: ContextVector,
    /// `-inf` when infeasible.
    pub score: f64,
    pub probability_at_target: f64,
    pub divergence: f64,
    pub feasible: bool,
}

impl SearchCandidate {
    /// True when `self` should replace `incumbent`: strictly higher score,
    /// or an equal score at a lower batch index.
    pub fn beats(&self, incumbent: &SearchCandidate) -> bool {
        if !self.feasible {
            return false;
        }
        if !incumbent.feasible {
            return true;
        }
        match self.score.total_cmp(&incumbent.score) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Equal => self.index < incumbent.index,
            std::cmp::Ordering::Less => false,
        }
    }
}

/// Deterministic reduction: best feasible candidate by score, lowest index
/// on ties. `None` when nothing is feasible.
pub fn best_of(candidates: &[SearchCandidate]) -> Option<&SearchCandidate> {
    candidates
        .iter()
        .filter(|c| c.feasible)
        .fold(None, |best: Option<&SearchCandidate>, c| match best {
            Some(b) if !c.beats(b) => Some(b),
            _ => Some(c),
        })
}
