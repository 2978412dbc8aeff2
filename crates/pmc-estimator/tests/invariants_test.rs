//! Property tests for the invariants every estimation must hold.

use pmc_core::config::{PmcConfig, SearchConfig};
use pmc_core::traits::{BaselineProvider, BaselineRequest, DivergenceMeasure, MomentMapper, Refitter};
use pmc_core::types::{BaselineMode, ContextVector, Status, ThreePointEstimate};
use pmc_estimator::numeric::{interpolate, invert};
use pmc_estimator::{
    BetaRefitter, CopulaMomentMapper, EstimationInput, Estimator, KlDivergence,
    PertBaselineProvider,
};
use proptest::prelude::*;

fn estimate_strategy() -> impl Strategy<Value = ThreePointEstimate> {
    (0.1f64..1000.0, 0.0f64..1.0, 0.01f64..500.0).prop_map(|(o, frac, width)| {
        let p = o + width;
        let m = o + frac * width;
        ThreePointEstimate::new(o, m, p).unwrap()
    })
}

fn context_strategy() -> impl Strategy<Value = ContextVector> {
    (
        0.0f64..=100.0,
        0.0f64..=100.0,
        0.0f64..=100.0,
        0.0f64..=100.0,
        0.0f64..=50.0,
        0.0f64..=100.0,
        0.0f64..=100.0,
    )
        .prop_map(|(a, b, c, d, e, f, g)| ContextVector::from_array([a, b, c, d, e, f, g]))
}

fn tiny_config() -> PmcConfig {
    PmcConfig {
        search: SearchConfig {
            unseeded_samples: Some(20),
            warm_start_samples: Some(8),
            local_iterations: Some(4),
            ..Default::default()
        },
        ..Default::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn baseline_cdf_is_monotone(estimate in estimate_strategy()) {
        let baseline = PertBaselineProvider::new(BaselineMode::Pert)
            .build(&BaselineRequest {
                estimate,
                target: estimate.pert_mean(),
                confidence_level: 0.9,
                sample_count: 1000,
            })
            .unwrap();
        let ys = baseline.cdf.ys();
        prop_assert!(ys.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(ys.iter().all(|y| (0.0..=1.0).contains(y)));
        prop_assert!(baseline.probability_at_target > 0.0 && baseline.probability_at_target < 1.0);
        prop_assert_eq!(ys.last().copied(), Some(1.0));
        let q = invert(&baseline.cdf, 0.5).unwrap();
        prop_assert!(q >= estimate.optimistic - 1e-9 && q <= estimate.pessimistic + 1e-9);
    }

    #[test]
    fn moments_stay_in_unit_interval(context in context_strategy(), cv in 0.0f64..5.0) {
        let m = CopulaMomentMapper::new().map(&context, cv);
        prop_assert!((0.0..=1.0).contains(&m.mean_shift));
        prop_assert!((0.0..=1.0).contains(&m.variance_shrink));
    }

    #[test]
    fn reshaped_curves_are_valid(estimate in estimate_strategy(), context in context_strategy()) {
        let baseline = PertBaselineProvider::new(BaselineMode::Pert)
            .build(&BaselineRequest {
                estimate,
                target: estimate.pert_mean(),
                confidence_level: 0.9,
                sample_count: 1000,
            })
            .unwrap();
        let adjustment = CopulaMomentMapper::new().map(&context, baseline.coefficient_of_variation);
        let reshaped = BetaRefitter::new().reshape(&baseline, &adjustment, &context);
        prop_assert!(reshaped.pdf.is_finite());
        prop_assert!(reshaped.cdf.ys().windows(2).all(|w| w[0] <= w[1]));
        let p = interpolate(&reshaped.cdf, baseline.target).unwrap();
        prop_assert!((0.0..=1.0).contains(&p));
        let kl = KlDivergence::new().divergence(&reshaped.pdf, &baseline.pdf);
        prop_assert!(kl >= 0.0);
    }

    #[test]
    fn manual_never_regresses(estimate in estimate_strategy(), context in context_strategy()) {
        let result = Estimator::new(tiny_config())
            .estimate(&EstimationInput::new(estimate).with_manual_context(context))
            .unwrap();
        prop_assert!(matches!(result.status, Status::Manual | Status::ManualReverted));
        prop_assert!(result.final_probability >= result.baseline_probability);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn optimized_never_regresses(estimate in estimate_strategy(), shift in -0.5f64..0.5) {
        let target = estimate.pert_mean() + shift * estimate.range();
        let result = Estimator::new(tiny_config())
            .estimate(&EstimationInput::new(estimate).with_target(target))
            .unwrap();
        prop_assert!(result.final_probability >= result.baseline_probability - 1e-9);
        prop_assert!(result.final_probability.is_finite());
        prop_assert!(result.sliders.validate().is_ok());
    }
}
