//! Latin-hypercube sampling with a directional bias.

use pmc_core::constants::{DIMENSIONS, SIGNED_WEIGHTS};

use super::bounds::SearchBounds;
use crate::numeric::Mulberry32;

/// Largest directional bias.
pub const MAX_BIAS: f64 = 0.3;

/// `n` points, one per stratum on every axis, strata shuffled independently.
pub fn latin_hypercube(n: usize, bounds: &SearchBounds, rng: &mut Mulberry32) -> Vec<[f64; DIMENSIONS]> {
    let mut samples = vec![[0.0; DIMENSIONS]; n];
    if n == 0 {
        return samples;
    }
    for d in 0..DIMENSIONS {
        let mut strata: Vec<usize> = (0..n).collect();
        // Fisher-Yates
        for i in (1..n).rev() {
            let j = rng.below(i + 1);
            strata.swap(i, j);
        }
        for (sample, &stratum) in samples.iter_mut().zip(&strata) {
            let u = (stratum as f64 + rng.next_f64()) / n as f64;
            sample[d] = bounds.lower[d] + u * bounds.width(d);
        }
    }
    samples
}

/// `clamp(0.1·max(0, cv − 0.5) + 0.2·max(0, 0.5 − p0), 0, 0.3)`.
///
/// Grows when the baseline is wide or the target is unlikely.
pub fn directional_bias(coefficient_of_variation: f64, baseline_probability: f64) -> f64 {
    let bias = 0.1 * (coefficient_of_variation - 0.5).max(0.0)
        + 0.2 * (0.5 - baseline_probability).max(0.0);
    if bias.is_finite() {
        bias.clamp(0.0, MAX_BIAS)
    } else {
        0.0
    }
}

/// Move a point a fraction `bias` of the way toward the confident corner:
/// up for narrowing dimensions, down for widening ones.
pub fn apply_bias(x: &[f64; DIMENSIONS], bias: f64, bounds: &SearchBounds) -> [f64; DIMENSIONS] {
    let mut out = *x;
    for (i, v) in out.iter_mut().enumerate() {
        if SIGNED_WEIGHTS[i] >= 0.0 {
            *v += bias * (bounds.upper[i] - *v);
        } else {
            *v -= bias * (*v - bounds.lower[i]);
        }
    }
    bounds.clamp(&out)
}
