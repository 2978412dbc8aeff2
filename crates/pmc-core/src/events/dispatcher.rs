//! EventDispatcher: synchronous event dispatch, zero overhead when empty.

use std::sync::Arc;

use super::handler::EstimationEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
///
/// When no handlers are registered, `emit` iterates over an empty Vec.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EstimationEventHandler>>,
}

impl EventDispatcher {
    /// Create a new empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register an event handler.
    pub fn register(&mut self, handler: Arc<dyn EstimationEventHandler>) {
        self.handlers.push(handler);
    }

    /// Returns the number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Emit an event to all registered handlers.
    /// A panicking handler is logged and does not stop later handlers.
    fn emit<F: Fn(&dyn EstimationEventHandler)>(&self, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                ::tracing::warn!("event handler panicked; continuing with remaining handlers");
            }
        }
    }

    pub fn emit_baseline_built(&self, event: &BaselineBuiltEvent) {
        self.emit(|h| h.on_baseline_built(event));
    }

    pub fn emit_search_stage_complete(&self, event: &SearchStageEvent) {
        self.emit(|h| h.on_search_stage_complete(event));
    }

    pub fn emit_floor_promoted(&self, event: &FloorPromotedEvent) {
        self.emit(|h| h.on_floor_promoted(event));
    }

    pub fn emit_regression_reverted(&self, event: &RegressionRevertedEvent) {
        self.emit(|h| h.on_regression_reverted(event));
    }

    pub fn emit_estimation_complete(&self, event: &EstimationCompleteEvent) {
        self.emit(|h| h.on_estimation_complete(event));
    }

    pub fn emit_error(&self, event: &ErrorEvent) {
        self.emit(|h| h.on_error(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
