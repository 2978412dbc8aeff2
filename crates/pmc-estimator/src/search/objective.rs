//! Candidate scoring: feasibility, divergence gate, leash and anchoring.

use pmc_core::config::KlGateMode;
use pmc_core::constants::{
    ANCHOR_PULL, ANCHOR_THRESHOLD, DEVIATION_FLOOR, DIMENSIONS, HARD_REVERT_JITTER,
    HARD_REVERT_THRESHOLD,
};
use pmc_core::traits::{DivergenceMeasure, MomentMapper, Refitter};
use pmc_core::types::{Baseline, ContextVector, MomentAdjustment, SearchCandidate};
use statrs::function::erf::erf;

use super::bounds::SearchBounds;
use crate::numeric::Mulberry32;
use crate::reshape::target_moments;

/// Perturbations tried on an infeasible point before giving up.
pub const MAX_NUDGES: usize = 3;
/// Budget-dimension step per nudge.
pub const NUDGE_STEP: f64 = 0.1;
/// Largest mean shift as a fraction of `slack · range`.
pub const SHIFT_ALLOWANCE: f64 = 0.1;

/// The seed a conservative re-optimization is tethered to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leash {
    pub seed: [f64; DIMENSIONS],
    /// `0.05 · (1 − p0)`.
    pub weight: f64,
}

impl Leash {
    pub fn new(seed: [f64; DIMENSIONS], baseline_probability: f64) -> Self {
        Self {
            seed,
            weight: 0.05 * (1.0 - baseline_probability).clamp(0.0, 1.0),
        }
    }

    /// `weight · (exp(10·max(0, d̄ − 0.05)) − 1)` for mean relative deviation `d̄`.
    pub fn penalty(&self, x: &[f64; DIMENSIONS]) -> f64 {
        let mean_dev = (0..DIMENSIONS)
            .map(|i| relative_deviation(x[i], self.seed[i]))
            .sum::<f64>()
            / DIMENSIONS as f64;
        self.weight * ((10.0 * (mean_dev - 0.05).max(0.0)).exp() - 1.0)
    }

    /// Pull drifting dimensions back toward the seed.
    ///
    /// Beyond 50% relative deviation a dimension is re-seeded within ±10% of
    /// the seed; beyond 8% it moves 80% of the way back.
    pub fn anchor(&self, x: &[f64; DIMENSIONS], rng: &mut Mulberry32) -> [f64; DIMENSIONS] {
        let mut out = *x;
        for (i, v) in out.iter_mut().enumerate() {
            let s = self.seed[i];
            let dev = relative_deviation(*v, s);
            if dev > HARD_REVERT_THRESHOLD {
                *v = s * (1.0 + rng.range(-HARD_REVERT_JITTER, HARD_REVERT_JITTER));
            } else if dev > ANCHOR_THRESHOLD {
                *v = s + (1.0 - ANCHOR_PULL) * (*v - s);
            }
        }
        out
    }
}

/// `|x − s| / max(|s|, 0.05)`.
pub fn relative_deviation(x: f64, seed: f64) -> f64 {
    (x - seed).abs() / seed.abs().max(DEVIATION_FLOOR)
}

/// Pull only (no hard revert): dimensions beyond 8% move 80% back.
pub fn reanchor(x: &[f64; DIMENSIONS], seed: &[f64; DIMENSIONS]) -> [f64; DIMENSIONS] {
    let mut out = *x;
    for (i, v) in out.iter_mut().enumerate() {
        if relative_deviation(*v, seed[i]) > ANCHOR_THRESHOLD {
            *v = seed[i] + (1.0 - ANCHOR_PULL) * (*v - seed[i]);
        }
    }
    out
}

/// Result of scoring one point.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub candidate: SearchCandidate,
    /// Geometrically feasible but over the divergence ceiling.
    pub rejected_by_divergence: bool,
}

/// Everything needed to score a point against one baseline.
pub struct Objective<'a> {
    pub baseline: &'a Baseline,
    pub mapper: &'a dyn MomentMapper,
    pub refitter: &'a dyn Refitter,
    pub divergence: &'a dyn DivergenceMeasure,
    pub bounds: SearchBounds,
    pub bias: f64,
    pub kl_ceiling: f64,
    pub kl_gate: KlGateMode,
    /// Sub-seeds for stochastic anchoring derive from this and the index.
    pub seed: u64,
    pub leash: Option<Leash>,
}

impl<'a> Objective<'a> {
    /// Same objective tethered to `leash`.
    pub fn with_leash(&self, leash: Leash) -> Objective<'a> {
        Objective {
            baseline: self.baseline,
            mapper: self.mapper,
            refitter: self.refitter,
            divergence: self.divergence,
            bounds: self.bounds,
            bias: self.bias,
            kl_ceiling: self.kl_ceiling,
            kl_gate: self.kl_gate,
            seed: self.seed,
            leash: Some(leash),
        }
    }

    /// Score of the unmodified baseline: `p0^(1+bias)`.
    pub fn baseline_score(&self) -> f64 {
        self.baseline
            .probability_at_target
            .max(0.0)
            .powf(1.0 + self.bias)
    }

    /// Score `unit` as batch item `index`.
    ///
    /// Infeasible points have their budget dimension nudged down up to
    /// [`MAX_NUDGES`] times before being marked infeasible with score `-inf`.
    pub fn evaluate(&self, unit: &[f64; DIMENSIONS], index: usize) -> Evaluation {
        let mut x = self.bounds.clamp(unit);
        if let Some(leash) = &self.leash {
            let mut rng = Mulberry32::for_index(self.seed, index as u64);
            x = self.bounds.clamp(&leash.anchor(&x, &mut rng));
        }

        let mut attempt = 0;
        loop {
            let vector = ContextVector::from_unit(&x);
            let adjustment = self.mapper.map(&vector, self.baseline.coefficient_of_variation);
            let reshaped = self.refitter.reshape(self.baseline, &adjustment, &vector);
            let divergence = self.divergence.divergence(&reshaped.pdf, &self.baseline.pdf);
            let p = reshaped.probability_at_target.clamp(0.0, 1.0);

            let geometric = self.shift_feasible(&adjustment);
            let within_gate = divergence <= self.kl_ceiling || self.kl_gate == KlGateMode::Diagnostic;

            if geometric && within_gate {
                let leash_penalty = self.leash.map(|l| l.penalty(&x)).unwrap_or(0.0);
                let score = p.powf(1.0 + self.bias) * (-divergence).exp() * (-leash_penalty).exp();
                return Evaluation {
                    candidate: SearchCandidate {
                        index,
                        unit: x,
                        vector,
                        score,
                        probability_at_target: p,
                        divergence,
                        feasible: true,
                    },
                    rejected_by_divergence: false,
                };
            }
            if attempt == MAX_NUDGES {
                return Evaluation {
                    candidate: SearchCandidate {
                        index,
                        unit: x,
                        vector,
                        score: f64::NEG_INFINITY,
                        probability_at_target: p,
                        divergence,
                        feasible: false,
                    },
                    rejected_by_divergence: geometric && !within_gate,
                };
            }
            x[0] = (x[0] - NUDGE_STEP).max(self.bounds.lower[0]);
            attempt += 1;
        }
    }

    /// Synthetic-estimate check on the moment shift.
    ///
    /// `O' = O − shift`, `M' = M − shift`, `P' = P − k·shift` with
    /// `k = sqrt(var'/var)` must stay ordered, and the shift may not exceed
    /// `0.1 · slack · range` where `slack = 1 + erf(|skew|/√2)·min(cv, 1)`.
    pub fn shift_feasible(&self, adjustment: &MomentAdjustment) -> bool {
        let b = self.baseline;
        let target = target_moments(b, adjustment);
        let shift = b.mean - target.mean;
        let k = if b.variance > 0.0 {
            (target.variance / b.variance).sqrt()
        } else {
            1.0
        };
        let o = b.estimate.optimistic - shift;
        let m = b.estimate.most_likely - shift;
        let p = b.estimate.pessimistic - k * shift;
        if !(o <= m && m <= p && o < p) {
            return false;
        }

        let cv = b.coefficient_of_variation.clamp(0.0, 1.0);
        let slack = 1.0 + erf(b.skew.abs() / std::f64::consts::SQRT_2) * cv;
        shift <= SHIFT_ALLOWANCE * slack * b.estimate.range()
    }
}
