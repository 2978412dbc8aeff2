//! Conservative second pass seeded from a first-pass result.

use pmc_core::config::SearchConfig;
use pmc_core::events::{EventDispatcher, SearchStage, SearchStageEvent};
use pmc_core::types::SearchCandidate;
use tracing::debug;

use super::global::{GlobalSearch, SeedPoint};
use super::local::LocalRefiner;
use super::objective::{Leash, Objective};

/// What the adaptive pass found.
#[derive(Debug, Clone)]
pub struct AdaptiveOutcome {
    pub best: SearchCandidate,
    pub evaluations: usize,
    pub divergence_rejections: usize,
    pub local_iterations: usize,
    /// Probe level 1: only the seed was evaluated.
    pub fast_path: bool,
}

/// Re-runs global and local search on a leashed objective.
#[derive(Debug, Clone)]
pub struct AdaptiveController {
    config: SearchConfig,
}

impl AdaptiveController {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn run(
        &self,
        objective: &Objective<'_>,
        seed: &SearchCandidate,
        probe_level: u8,
        events: &EventDispatcher,
    ) -> AdaptiveOutcome {
        let leash = Leash::new(seed.unit, objective.baseline.probability_at_target);
        let tethered = objective.with_leash(leash);

        let outcome = if probe_level <= 1 {
            let eval = tethered.evaluate(&seed.unit, 0);
            AdaptiveOutcome {
                divergence_rejections: usize::from(eval.rejected_by_divergence),
                best: eval.candidate,
                evaluations: 1,
                local_iterations: 0,
                fast_path: true,
            }
        } else {
            let seed_point = SeedPoint {
                unit: seed.unit,
                probe_level,
            };
            let global = GlobalSearch::new(&tethered, &self.config).run(Some(&seed_point), events);
            let mut evaluations = global.evaluations;
            let start = match global.best {
                Some(best) => best,
                None => {
                    evaluations += 1;
                    tethered.evaluate(&seed.unit, evaluations).candidate
                }
            };
            let local = LocalRefiner::seeded(&self.config, seed.unit).refine(
                &tethered,
                start,
                evaluations + 1,
                events,
            );
            AdaptiveOutcome {
                best: local.best,
                evaluations: evaluations + local.evaluations,
                divergence_rejections: global.divergence_rejections + local.divergence_rejections,
                local_iterations: local.iterations,
                fast_path: false,
            }
        };

        debug!(
            probe_level,
            fast_path = outcome.fast_path,
            search_evaluations = outcome.evaluations,
            search_best_score = outcome.best.score,
            "adaptive pass complete"
        );
        events.emit_search_stage_complete(&SearchStageEvent {
            stage: SearchStage::Adaptive,
            evaluations: outcome.evaluations,
            best_score: outcome.best.score,
            best_probability: outcome.best.probability_at_target,
            divergence_rejections: outcome.divergence_rejections,
        });
        outcome
    }
}
