//! Method-of-moments Beta refit.

use pmc_core::constants::{MAX_MEAN_SHIFT, MAX_VARIANCE_SHRINK};
use pmc_core::types::{Baseline, MomentAdjustment, RefitParameters};

use crate::numeric::clamp01;

/// Relative margin keeping the shifted mean strictly inside `(O, P)`.
const MEAN_MARGIN: f64 = 1e-6;
/// Smallest variance a refit may target.
const VARIANCE_FLOOR: f64 = 1e-12;

/// Mean and variance the reshaped distribution should have.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetMoments {
    pub mean: f64,
    pub variance: f64,
}

/// `mean' = mean − 0.2·m0·|mean|` kept inside `(O, P)`;
/// `var' = clamp(var·(1 − 0.5·m1), ε, var)`.
///
/// The shift is taken on `|mean|` so it always moves the mean down, also for
/// estimates below zero.
pub fn target_moments(baseline: &Baseline, adjustment: &MomentAdjustment) -> TargetMoments {
    let estimate = &baseline.estimate;
    let margin = MEAN_MARGIN * estimate.range();
    let shifted =
        baseline.mean - clamp01(adjustment.mean_shift) * MAX_MEAN_SHIFT * baseline.mean.abs();
    let mean = shifted
        .max(estimate.optimistic + margin)
        .min(estimate.pessimistic - margin);

    let shrunk = baseline.variance * (1.0 - clamp01(adjustment.variance_shrink) * MAX_VARIANCE_SHRINK);
    let variance = shrunk.min(baseline.variance).max(VARIANCE_FLOOR);

    TargetMoments { mean, variance }
}

/// Beta shapes on the unit interval matching the target moments.
///
/// `None` when the inversion yields a non-positive or non-finite shape,
/// i.e. when the target variance is too wide for the target mean.
pub fn refit_parameters(baseline: &Baseline, adjustment: &MomentAdjustment) -> Option<RefitParameters> {
    let moments = target_moments(baseline, adjustment);
    let range = baseline.estimate.range();
    let u = baseline.estimate.to_unit(moments.mean);
    let v = moments.variance / (range * range);
    if !(v > 0.0 && v.is_finite()) {
        return None;
    }
    let k = u * (1.0 - u) / v - 1.0;
    RefitParameters::new(u * k, (1.0 - u) * k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::PertBaselineProvider;
    use pmc_core::traits::{BaselineProvider, BaselineRequest};
    use pmc_core::types::ThreePointEstimate;

    fn baseline() -> Baseline {
        PertBaselineProvider::default()
            .build(&BaselineRequest {
                estimate: ThreePointEstimate::new(10.0, 20.0, 30.0).unwrap(),
                target: 20.0,
                confidence_level: 0.9,
                sample_count: 1000,
            })
            .unwrap()
    }

    #[test]
    fn test_target_moments_limits() {
        let b = baseline();
        let m = target_moments(&b, &MomentAdjustment::new(1.0, 1.0));
        assert!((m.mean - 16.0).abs() < 1e-9);
        assert!((m.variance - 0.5 * b.variance).abs() < 1e-12);

        let neutral = target_moments(&b, &MomentAdjustment::NEUTRAL);
        assert_eq!(neutral.mean, b.mean);
        assert_eq!(neutral.variance, b.variance);
    }

    #[test]
    fn test_refit_recovers_baseline_shape() {
        let b = baseline();
        let shape = refit_parameters(&b, &MomentAdjustment::NEUTRAL).unwrap();
        // Beta(3, 3); the grid variance is a close numerical estimate.
        assert!((shape.alpha - 3.0).abs() < 0.05, "alpha {}", shape.alpha);
        assert!((shape.beta - 3.0).abs() < 0.05, "beta {}", shape.beta);
    }

    #[test]
    fn test_refit_rejects_too_wide_variance() {
        let mut b = baseline();
        // Variance of a two-point distribution at the edges cannot be beaten.
        b.variance = 0.3 * b.estimate.range().powi(2);
        assert!(refit_parameters(&b, &MomentAdjustment::new(0.5, 0.0)).is_none());
    }

    #[test]
    fn test_shift_lowers_negative_mean() {
        let b = PertBaselineProvider::default()
            .build(&BaselineRequest {
                estimate: ThreePointEstimate::new(-30.0, -20.0, -10.0).unwrap(),
                target: -20.0,
                confidence_level: 0.9,
                sample_count: 1000,
            })
            .unwrap();
        let m = target_moments(&b, &MomentAdjustment::new(0.5, 0.0));
        // −20 − 0.2·0.5·20
        assert!((m.mean + 22.0).abs() < 1e-9, "mean {}", m.mean);
        assert!(refit_parameters(&b, &MomentAdjustment::new(0.5, 0.0)).is_some());
    }
}
