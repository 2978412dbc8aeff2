//! EstimationEventHandler trait, all methods no-op by default.

use super::types::*;

/// Trait for observing an estimation run.
///
/// All methods have no-op default implementations, so handlers only need
/// to override the events they care about. `Send + Sync` because search
/// stages run on the rayon pool.
pub trait EstimationEventHandler: Send + Sync {
    fn on_baseline_built(&self, _event: &BaselineBuiltEvent) {}
    fn on_search_stage_complete(&self, _event: &SearchStageEvent) {}
    fn on_floor_promoted(&self, _event: &FloorPromotedEvent) {}
    fn on_regression_reverted(&self, _event: &RegressionRevertedEvent) {}
    fn on_estimation_complete(&self, _event: &EstimationCompleteEvent) {}
    fn on_error(&self, _event: &ErrorEvent) {}
}
