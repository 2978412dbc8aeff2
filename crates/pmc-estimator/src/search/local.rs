//! Derivative-free pattern search around the global winner.

use pmc_core::config::SearchConfig;
use pmc_core::constants::{DIMENSIONS, SIGNED_WEIGHTS};
use pmc_core::events::{EventDispatcher, SearchStage, SearchStageEvent};
use pmc_core::types::{best_of, SearchCandidate};
use tracing::debug;

use super::evaluate_batch;
use super::objective::{reanchor, Objective};

/// Step shrink on a stalled unseeded iteration.
pub const UNSEEDED_SHRINK: f64 = 0.6;
/// Step shrink on a stalled seeded iteration.
pub const SEEDED_SHRINK: f64 = 0.7;
/// Seeded runs re-anchor to the seed this often.
pub const REANCHOR_EVERY: usize = 10;

/// What the refiner settled on.
#[derive(Debug, Clone)]
pub struct LocalOutcome {
    pub best: SearchCandidate,
    pub iterations: usize,
    pub evaluations: usize,
    pub divergence_rejections: usize,
}

/// Compass search with per-dimension steps scaled by weight and skew.
#[derive(Debug, Clone)]
pub struct LocalRefiner {
    max_iterations: usize,
    shrink: f64,
    initial_step: f64,
    tolerance: f64,
    anchor: Option<[f64; DIMENSIONS]>,
    parallel: bool,
}

impl LocalRefiner {
    pub fn unseeded(config: &SearchConfig) -> Self {
        Self {
            max_iterations: config.effective_local_iterations(),
            shrink: UNSEEDED_SHRINK,
            initial_step: config.effective_initial_step(),
            tolerance: config.effective_step_tolerance(),
            anchor: None,
            parallel: config.effective_parallel(),
        }
    }

    /// Deeper, slower-shrinking refiner tethered to `seed`.
    pub fn seeded(config: &SearchConfig, seed: [f64; DIMENSIONS]) -> Self {
        Self {
            max_iterations: config.effective_seeded_local_iterations(),
            shrink: SEEDED_SHRINK,
            anchor: Some(seed),
            ..Self::unseeded(config)
        }
    }

    /// Candidate set around `x`: ± a scaled step on each axis, then the two
    /// diagonals `x ± ρ·sign(w)`.
    pub fn neighbours(
        &self,
        objective: &Objective<'_>,
        x: &[f64; DIMENSIONS],
        rho: f64,
    ) -> Vec<[f64; DIMENSIONS]> {
        let skew_factor = 1.0 + 0.25 * objective.baseline.skew.tanh();
        let mut out = Vec::with_capacity(2 * DIMENSIONS + 2);
        for (i, w) in SIGNED_WEIGHTS.iter().enumerate() {
            let step = rho * 0.25 / (w.abs() + 0.05) * skew_factor;
            for direction in [1.0, -1.0] {
                let mut p = *x;
                p[i] += direction * step;
                out.push(objective.bounds.clamp(&p));
            }
        }
        for direction in [1.0, -1.0] {
            let mut p = *x;
            for (v, w) in p.iter_mut().zip(SIGNED_WEIGHTS.iter()) {
                *v += direction * rho * w.signum();
            }
            out.push(objective.bounds.clamp(&p));
        }
        out
    }

    /// Refine `start`. Batch indices begin at `index_base` so sub-seeds do
    /// not collide with earlier stages.
    pub fn refine(
        &self,
        objective: &Objective<'_>,
        start: SearchCandidate,
        index_base: usize,
        events: &EventDispatcher,
    ) -> LocalOutcome {
        let mut current = start;
        let mut rho = self.initial_step;
        let mut next_index = index_base;
        let mut iterations = 0;
        let mut evaluations = 0;
        let mut divergence_rejections = 0;

        while iterations < self.max_iterations && rho >= self.tolerance {
            let points = self.neighbours(objective, &current.unit, rho);
            let batch = evaluate_batch(objective, &points, next_index, self.parallel);
            next_index += points.len();
            evaluations += points.len();
            divergence_rejections += batch.divergence_rejections;
            iterations += 1;

            match best_of(&batch.candidates) {
                Some(c) if c.score > current.score => current = c.clone(),
                _ => rho *= self.shrink,
            }

            if let Some(seed) = &self.anchor {
                if iterations % REANCHOR_EVERY == 0 {
                    let anchored = reanchor(&current.unit, seed);
                    if anchored != current.unit {
                        let eval = objective.evaluate(&anchored, next_index);
                        next_index += 1;
                        evaluations += 1;
                        if eval.candidate.feasible {
                            current = eval.candidate;
                        }
                    }
                }
            }
        }

        debug!(
            local_iterations = iterations,
            search_evaluations = evaluations,
            search_best_score = current.score,
            final_step = rho,
            "local refinement complete"
        );
        events.emit_search_stage_complete(&SearchStageEvent {
            stage: SearchStage::Local,
            evaluations,
            best_score: current.score,
            best_probability: current.probability_at_target,
            divergence_rejections,
        });

        LocalOutcome {
            best: current,
            iterations,
            evaluations,
            divergence_rejections,
        }
    }
}
