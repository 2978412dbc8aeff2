//! End-to-end tests for the estimator facade.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pmc_core::config::{PmcConfig, SearchConfig};
use pmc_core::errors::{EstimationError, InputError};
use pmc_core::events::{ErrorEvent, EstimationCompleteEvent, EstimationEventHandler};
use pmc_core::traits::MomentMapper;
use pmc_core::types::{
    BaselineMode, ContextVector, MomentAdjustment, ReshapeMethod, Stage, Status,
    ThreePointEstimate,
};
use pmc_estimator::{
    BetaRefitter, EstimationInput, Estimator, KlDivergence, PertBaselineProvider, StorageRecord,
};

fn fast_config() -> PmcConfig {
    PmcConfig {
        search: SearchConfig {
            unseeded_samples: Some(60),
            warm_start_samples: Some(20),
            local_iterations: Some(12),
            seeded_local_iterations: Some(12),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn input(o: f64, m: f64, p: f64) -> EstimationInput {
    EstimationInput::new(ThreePointEstimate::new(o, m, p).unwrap())
}

#[derive(Default)]
struct CountingHandler {
    complete: AtomicUsize,
    errors: AtomicUsize,
}

impl EstimationEventHandler for CountingHandler {
    fn on_estimation_complete(&self, _event: &EstimationCompleteEvent) {
        self.complete.fetch_add(1, Ordering::Relaxed);
    }

    fn on_error(&self, _event: &ErrorEvent) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }
}

#[test]
fn test_symmetric_estimate_without_optimization() {
    let estimator = Estimator::new(fast_config());
    let result = estimator
        .estimate(&input(10.0, 20.0, 30.0).with_optimize(false))
        .unwrap();

    assert!((result.baseline_probability - 0.5).abs() < 0.02);
    assert_eq!(result.final_probability, result.baseline_probability);
    assert_eq!(result.status, Status::NoOptimize);
    assert_eq!(result.reshape_method, ReshapeMethod::PassThrough);
    assert!(result.sliders.is_zero());
    assert_eq!(result.divergence, 0.0);
}

#[test]
fn test_optimized_never_regresses() {
    let estimator = Estimator::new(fast_config());
    for (o, m, p) in [(10.0, 20.0, 30.0), (1.0, 2.0, 3.0), (5.0, 8.0, 20.0), (100.0, 110.0, 400.0)] {
        let result = estimator.estimate(&input(o, m, p)).unwrap();
        assert!(
            result.final_probability >= result.baseline_probability - 1e-9,
            "{o}/{m}/{p}: {} < {}",
            result.final_probability,
            result.baseline_probability
        );
        assert!(matches!(result.status, Status::Ok | Status::NoOptimize | Status::Reverted));
        assert!(result.reshaped_pdf.is_finite());
        assert!(result.reshaped_cdf.is_finite());
        assert!(result.divergence.is_finite());
        assert!(result.search.is_some());
    }
}

#[test]
fn test_small_estimate_has_no_nan() {
    let result = Estimator::new(fast_config())
        .estimate(&input(1.0, 2.0, 3.0).with_target(2.0))
        .unwrap();
    assert!(result.baseline_probability.is_finite());
    assert!(result.final_probability.is_finite());
    assert!(result.final_value_at_confidence.is_finite());
    assert!(!result.narrative.contains("NaN"));
}

#[test]
fn test_accepted_result_records_full_trail() {
    let result = Estimator::new(fast_config())
        .estimate(&input(10.0, 20.0, 30.0).with_target(18.0))
        .unwrap();
    assert_eq!(result.stages.first(), Some(&Stage::Searching));
    let last = result.stages.last().copied();
    assert!(matches!(last, Some(Stage::Accepted) | Some(Stage::Reverted)));
    assert!(result.stages.contains(&Stage::RegressionCheck));
}

#[test]
fn test_manual_zero_context_is_pass_through() {
    let result = Estimator::new(fast_config())
        .estimate(&input(10.0, 20.0, 30.0).with_manual_context(ContextVector::ZERO))
        .unwrap();
    assert_eq!(result.status, Status::Manual);
    assert_eq!(result.reshape_method, ReshapeMethod::PassThrough);
    assert_eq!(result.final_probability, result.baseline_probability);
    assert!(result.search.is_none());
}

#[test]
fn test_manual_context_never_regresses() {
    let mut context = ContextVector::ZERO;
    context.budget_flexibility = 80.0;
    context.rework_percentage = 40.0;
    context.user_confidence = 10.0;
    let result = Estimator::new(fast_config())
        .estimate(&input(10.0, 20.0, 30.0).with_manual_context(context))
        .unwrap();

    assert!(matches!(result.status, Status::Manual | Status::ManualReverted));
    assert!(result.final_probability >= result.baseline_probability);
    if result.status == Status::ManualReverted {
        assert!(result.sliders.is_zero());
        assert_eq!(result.final_probability, result.baseline_probability);
    } else {
        assert_eq!(result.sliders, context);
    }
}

#[test]
fn test_estimate_is_deterministic() {
    let estimator = Estimator::new(fast_config());
    let request = input(5.0, 8.0, 20.0).with_target(9.0);
    let a = estimator.estimate(&request).unwrap();
    let b = estimator.estimate(&request).unwrap();
    assert_eq!(a.sliders, b.sliders);
    assert_eq!(a.final_probability, b.final_probability);
    assert_eq!(a.status, b.status);
    assert_eq!(a.search, b.search);
}

#[test]
fn test_parallel_and_sequential_agree() {
    let mut sequential = fast_config();
    sequential.search.parallel = Some(false);
    let request = input(10.0, 14.0, 40.0).with_target(15.0);
    let a = Estimator::new(fast_config()).estimate(&request).unwrap();
    let b = Estimator::new(sequential).estimate(&request).unwrap();
    assert_eq!(a.sliders, b.sliders);
    assert_eq!(a.final_probability, b.final_probability);
}

#[test]
fn test_adaptive_probe_one() {
    let result = Estimator::new(fast_config())
        .estimate(&input(10.0, 20.0, 30.0).with_target(19.0).with_adaptive(true, 1))
        .unwrap();
    let search = result.search.as_ref().unwrap();
    assert!(search.adaptive);
    assert!(result.final_probability >= result.baseline_probability - 1e-9);
}

#[test]
fn test_adaptive_probe_one_reproduces_fixed_run() {
    let estimator = Estimator::new(fast_config());
    for (o, m, p) in [(10.0, 20.0, 30.0), (10.0, 20.0, 60.0), (100.0, 150.0, 300.0)] {
        let request = input(o, m, p);
        let fixed = estimator.estimate(&request).unwrap();
        let adaptive = estimator
            .estimate(&request.clone().with_adaptive(true, 1))
            .unwrap();

        assert_eq!(adaptive.sliders, fixed.sliders, "{o}/{m}/{p}");
        assert_eq!(adaptive.reshaped_cdf, fixed.reshaped_cdf);
        assert_eq!(adaptive.reshaped_pdf, fixed.reshaped_pdf);
        assert_eq!(adaptive.final_probability, fixed.final_probability);
    }
}

#[test]
fn test_adaptive_deeper_probe() {
    let result = Estimator::new(fast_config())
        .estimate(&input(10.0, 20.0, 30.0).with_target(19.0).with_adaptive(true, 4))
        .unwrap();
    assert!(result.final_probability >= result.baseline_probability - 1e-9);
}

#[test]
fn test_invalid_inputs_rejected() {
    let estimator = Estimator::new(fast_config());

    let unordered = EstimationInput::new(ThreePointEstimate {
        optimistic: 30.0,
        most_likely: 20.0,
        pessimistic: 10.0,
    });
    assert!(matches!(
        estimator.estimate(&unordered),
        Err(EstimationError::Input(InputError::OutOfOrder { .. }))
    ));

    let probe = input(1.0, 2.0, 3.0).with_adaptive(true, 0);
    assert!(matches!(
        estimator.estimate(&probe),
        Err(EstimationError::Input(InputError::InvalidProbeLevel { value: 0 }))
    ));

    let mut context = ContextVector::ZERO;
    context.rework_percentage = 60.0;
    let manual = input(1.0, 2.0, 3.0).with_manual_context(context);
    assert!(matches!(
        estimator.estimate(&manual),
        Err(EstimationError::Input(InputError::InvalidContext { .. }))
    ));

    let target = input(1.0, 2.0, 3.0).with_target(f64::NAN);
    assert!(matches!(
        estimator.estimate(&target),
        Err(EstimationError::Input(InputError::NonFinite { field: "target" }))
    ));

    let confidence = input(1.0, 2.0, 3.0).with_confidence_level(1.0);
    assert!(matches!(
        estimator.estimate(&confidence),
        Err(EstimationError::Input(InputError::InvalidConfidenceLevel { .. }))
    ));
}

#[test]
fn test_events_emitted() {
    let handler = Arc::new(CountingHandler::default());
    let mut estimator = Estimator::new(fast_config());
    estimator.register_handler(handler.clone());

    estimator
        .estimate(&input(1.0, 2.0, 3.0).with_optimize(false))
        .unwrap();
    let _ = estimator.estimate(&input(1.0, 2.0, 3.0).with_adaptive(true, 9));

    assert_eq!(handler.complete.load(Ordering::Relaxed), 1);
    assert_eq!(handler.errors.load(Ordering::Relaxed), 1);
}

#[test]
fn test_batch_isolates_failures() {
    let estimator = Estimator::new(fast_config());
    let bad = EstimationInput::new(ThreePointEstimate {
        optimistic: 5.0,
        most_likely: 5.0,
        pessimistic: 5.0,
    });
    let results = estimator.estimate_many(
        &[input(1.0, 2.0, 3.0).with_optimize(false), bad, input(10.0, 20.0, 30.0).with_optimize(false)],
        None,
    );

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].status, Status::NoOptimize);
    assert_eq!(results[1].status, Status::Error);
    assert!(results[1].narrative.starts_with('['));
    assert_eq!(results[2].status, Status::NoOptimize);
}

#[test]
fn test_batch_budget_exhausted() {
    let estimator = Estimator::new(fast_config());
    let results = estimator.estimate_many(&[input(1.0, 2.0, 3.0), input(2.0, 3.0, 4.0)], Some(Duration::ZERO));
    assert!(results.iter().all(|r| r.status == Status::Error));
    assert!(results[0].narrative.starts_with("[BUDGET_EXHAUSTED]"));
    assert!(results[1].narrative.contains("task 1"));
}

#[test]
fn test_triangular_mode_sample_count() {
    let mut config = fast_config();
    config.baseline.mode = Some(BaselineMode::TriangularMonteCarlo);
    let estimator = Estimator::new(config);

    let too_few = input(10.0, 20.0, 30.0).with_sample_count(50);
    assert!(matches!(
        estimator.estimate(&too_few),
        Err(EstimationError::Input(InputError::InvalidSampleCount { value: 50, .. }))
    ));

    let result = estimator
        .estimate(&input(10.0, 20.0, 30.0).with_sample_count(2000))
        .unwrap();
    assert!(result.final_probability >= result.baseline_probability - 1e-9);
}

/// Mapper that never moves the distribution.
struct NeutralMapper;

impl MomentMapper for NeutralMapper {
    fn map(&self, _context: &ContextVector, _coefficient_of_variation: f64) -> MomentAdjustment {
        MomentAdjustment::NEUTRAL
    }
}

#[test]
fn test_custom_components() {
    let config = fast_config();
    let estimator = Estimator::with_components(
        config.clone(),
        Arc::new(PertBaselineProvider::from_config(&config.baseline)),
        Arc::new(NeutralMapper),
        Arc::new(BetaRefitter::new()),
        Arc::new(KlDivergence::new()),
    );
    let result = estimator.estimate(&input(10.0, 20.0, 30.0)).unwrap();
    assert_eq!(result.final_probability, result.baseline_probability);
    assert_eq!(result.reshape_method, ReshapeMethod::PassThrough);
}

#[test]
fn test_input_from_json_defaults() {
    let json = r#"{"estimate":{"optimistic":1.0,"mostLikely":2.0,"pessimistic":4.0}}"#;
    let parsed: EstimationInput = serde_json::from_str(json).unwrap();
    assert_eq!(parsed.confidence_level, 0.9);
    assert_eq!(parsed.sample_count, 1000);
    assert!(parsed.optimize);
    assert!(!parsed.adaptive);
    assert!(parsed.target.is_none());
    assert!(parsed.manual_context.is_none());
}

#[test]
fn test_storage_record_from_result() {
    let config = fast_config();
    let result = Estimator::new(config.clone())
        .estimate(&input(10.0, 20.0, 30.0))
        .unwrap();
    let record = StorageRecord::from_result(&result, &config.storage);
    assert!(record.pdf.len() <= config.storage.effective_max_points());
    assert_eq!(record.status, result.status);
    let json = record.to_json().unwrap();
    assert!(json.contains("finalProbability"));
}
