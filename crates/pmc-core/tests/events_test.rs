//! Tests for the event system.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pmc_core::events::*;
use pmc_core::types::{BaselineMode, Status};

/// A test handler that counts events.
struct CountingHandler {
    baseline_built: AtomicUsize,
    reverted: AtomicUsize,
    complete: AtomicUsize,
}

impl CountingHandler {
    fn new() -> Self {
        Self {
            baseline_built: AtomicUsize::new(0),
            reverted: AtomicUsize::new(0),
            complete: AtomicUsize::new(0),
        }
    }
}

impl EstimationEventHandler for CountingHandler {
    fn on_baseline_built(&self, _event: &BaselineBuiltEvent) {
        self.baseline_built.fetch_add(1, Ordering::Relaxed);
    }

    fn on_regression_reverted(&self, _event: &RegressionRevertedEvent) {
        self.reverted.fetch_add(1, Ordering::Relaxed);
    }

    fn on_estimation_complete(&self, _event: &EstimationCompleteEvent) {
        self.complete.fetch_add(1, Ordering::Relaxed);
    }
}

fn baseline_event() -> BaselineBuiltEvent {
    BaselineBuiltEvent {
        mode: BaselineMode::Pert,
        points: 200,
        mean: 20.0,
        probability_at_target: 0.5,
    }
}

#[test]
fn test_handler_noop_defaults() {
    struct NoopHandler;
    impl EstimationEventHandler for NoopHandler {}

    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(Arc::new(NoopHandler));
    dispatcher.emit_baseline_built(&baseline_event());
    assert_eq!(dispatcher.handler_count(), 1);
}

#[test]
fn test_dispatch_reaches_every_handler() {
    let a = Arc::new(CountingHandler::new());
    let b = Arc::new(CountingHandler::new());
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(a.clone());
    dispatcher.register(b.clone());

    dispatcher.emit_baseline_built(&baseline_event());
    dispatcher.emit_estimation_complete(&EstimationCompleteEvent {
        status: Status::Ok,
        baseline_probability: 0.5,
        final_probability: 0.6,
        divergence: 0.01,
        duration_ms: 3,
    });

    for h in [&a, &b] {
        assert_eq!(h.baseline_built.load(Ordering::Relaxed), 1);
        assert_eq!(h.complete.load(Ordering::Relaxed), 1);
        assert_eq!(h.reverted.load(Ordering::Relaxed), 0);
    }
}

#[test]
fn test_panicking_handler_does_not_block_others() {
    struct PanickingHandler;
    impl EstimationEventHandler for PanickingHandler {
        fn on_regression_reverted(&self, _event: &RegressionRevertedEvent) {
            panic!("boom");
        }
    }

    let counter = Arc::new(CountingHandler::new());
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(Arc::new(PanickingHandler));
    dispatcher.register(counter.clone());

    dispatcher.emit_regression_reverted(&RegressionRevertedEvent {
        attempted_probability: 0.4,
        baseline_probability: 0.5,
        manual: false,
    });
    assert_eq!(counter.reverted.load(Ordering::Relaxed), 1);
}

#[test]
fn test_empty_dispatcher_is_noop() {
    let dispatcher = EventDispatcher::new();
    dispatcher.emit_error(&ErrorEvent {
        message: "x".to_string(),
        error_code: "INPUT_ERROR".to_string(),
    });
    assert_eq!(dispatcher.handler_count(), 0);
}
