//! Global search over the context box.

use pmc_core::config::SearchConfig;
use pmc_core::constants::{DIMENSIONS, TYPICAL_GOOD_UNIT};
use pmc_core::events::{EventDispatcher, FloorPromotedEvent, SearchStage, SearchStageEvent};
use pmc_core::types::{best_of, SearchCandidate};
use tracing::{debug, info};

use super::lhs::{apply_bias, latin_hypercube};
use super::objective::Objective;
use super::{evaluate_batch, Batch};
use crate::numeric::Mulberry32;

/// Smallest seeded population above the fast path.
pub const MIN_SEEDED_SAMPLES: usize = 100;
/// Seeded population per probe level.
pub const SAMPLES_PER_PROBE: usize = 50;
/// First dimension left at its neutral value during warm start.
pub const WARM_START_DIMENSIONS: usize = 4;

/// Point a seeded search starts from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedPoint {
    pub unit: [f64; DIMENSIONS],
    /// Search depth, 1..=7.
    pub probe_level: u8,
}

/// What the global pass found.
#[derive(Debug, Clone, Default)]
pub struct GlobalOutcome {
    pub best: Option<SearchCandidate>,
    pub warm_start_best: Option<SearchCandidate>,
    pub evaluations: usize,
    pub divergence_rejections: usize,
    pub floor_promoted: bool,
}

/// Population size: `unseeded` without a seed; otherwise
/// `max(100, 50·probe)`, or just the seed at probe level 1.
pub fn population_size(seed: Option<&SeedPoint>, unseeded: usize) -> usize {
    match seed {
        None => unseeded,
        Some(s) if s.probe_level <= 1 => 1,
        Some(s) => MIN_SEEDED_SAMPLES.max(SAMPLES_PER_PROBE * s.probe_level as usize),
    }
}

/// Latin-hypercube search, warm start first.
pub struct GlobalSearch<'o, 'a> {
    objective: &'o Objective<'a>,
    unseeded_samples: usize,
    warm_start_samples: usize,
    seed: u64,
    parallel: bool,
}

impl<'o, 'a> GlobalSearch<'o, 'a> {
    pub fn new(objective: &'o Objective<'a>, config: &SearchConfig) -> Self {
        Self {
            objective,
            unseeded_samples: config.effective_unseeded_samples(),
            warm_start_samples: config.effective_warm_start_samples(),
            seed: config.effective_seed(),
            parallel: config.effective_parallel(),
        }
    }

    /// The sample set, seed first when seeded; always `population_size` points.
    pub fn population(&self, seed: Option<&SeedPoint>) -> Vec<[f64; DIMENSIONS]> {
        let n = population_size(seed, self.unseeded_samples);
        if let Some(s) = seed {
            if n == 1 {
                return vec![self.objective.bounds.clamp(&s.unit)];
            }
        }
        let bounds = &self.objective.bounds;
        let mut rng = Mulberry32::from_seed(self.seed);
        // The seed itself takes one slot of a seeded population.
        let draws = if seed.is_some() { n - 1 } else { n };
        let mut points: Vec<[f64; DIMENSIONS]> = latin_hypercube(draws, bounds, &mut rng)
            .iter()
            .map(|p| apply_bias(p, self.objective.bias, bounds))
            .collect();
        if let Some(s) = seed {
            points.insert(0, bounds.clamp(&s.unit));
        }
        points
    }

    /// Run the pass. Without a seed, a floor candidate is promoted when
    /// nothing beats the baseline score.
    pub fn run(&self, seed: Option<&SeedPoint>, events: &EventDispatcher) -> GlobalOutcome {
        let population = self.population(seed);
        let mut outcome = GlobalOutcome::default();

        let warm: Vec<[f64; DIMENSIONS]> = if population.len() > 1 {
            population
                .iter()
                .take(self.warm_start_samples)
                .map(|p| {
                    let mut padded = *p;
                    padded[WARM_START_DIMENSIONS..].fill(0.0);
                    padded
                })
                .collect()
        } else {
            Vec::new()
        };
        let warm_batch = evaluate_batch(self.objective, &warm, 0, self.parallel);
        outcome.warm_start_best = best_of(&warm_batch.candidates).cloned();
        self.report(SearchStage::WarmStart, &warm_batch, outcome.warm_start_best.as_ref(), events);

        let full_batch = evaluate_batch(self.objective, &population, warm.len(), self.parallel);
        self.report(SearchStage::Global, &full_batch, best_of(&full_batch.candidates), events);

        outcome.evaluations = warm_batch.candidates.len() + full_batch.candidates.len();
        outcome.divergence_rejections =
            warm_batch.divergence_rejections + full_batch.divergence_rejections;

        let mut pool = warm_batch.candidates;
        pool.extend(full_batch.candidates);
        outcome.best = best_of(&pool).cloned();

        let baseline_score = self.objective.baseline_score();
        let beats_baseline = outcome
            .best
            .as_ref()
            .is_some_and(|b| b.score > baseline_score);
        if seed.is_none() && !beats_baseline {
            let floor = self.objective.evaluate(&TYPICAL_GOOD_UNIT, pool.len());
            outcome.evaluations += 1;
            if floor.rejected_by_divergence {
                outcome.divergence_rejections += 1;
            }
            info!(
                baseline_score,
                floor_score = floor.candidate.score,
                feasible = floor.candidate.feasible,
                "no candidate beat the baseline; promoting floor context"
            );
            events.emit_floor_promoted(&FloorPromotedEvent {
                baseline_score,
                floor_score: floor.candidate.score,
            });
            outcome.best = Some(floor.candidate);
            outcome.floor_promoted = true;
        }
        outcome
    }

    fn report(
        &self,
        stage: SearchStage,
        batch: &Batch,
        best: Option<&SearchCandidate>,
        events: &EventDispatcher,
    ) {
        let best_score = best.map(|c| c.score).unwrap_or(f64::NEG_INFINITY);
        let best_probability = best.map(|c| c.probability_at_target).unwrap_or(0.0);
        debug!(
            stage = stage.name(),
            search_evaluations = batch.candidates.len(),
            search_best_score = best_score,
            divergence_rejections = batch.divergence_rejections,
            "search stage complete"
        );
        events.emit_search_stage_complete(&SearchStageEvent {
            stage,
            evaluations: batch.candidates.len(),
            best_score,
            best_probability,
            divergence_rejections: batch.divergence_rejections,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_sizes() {
        assert_eq!(population_size(None, 250), 250);
        let seed = |probe_level| SeedPoint {
            unit: [0.5; DIMENSIONS],
            probe_level,
        };
        assert_eq!(population_size(Some(&seed(1)), 250), 1);
        assert_eq!(population_size(Some(&seed(2)), 250), 100);
        assert_eq!(population_size(Some(&seed(5)), 250), 250);
        assert_eq!(population_size(Some(&seed(7)), 250), 350);
    }
}
