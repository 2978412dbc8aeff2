//! Distribution reshaping seam.

use crate::types::{
    Baseline, ContextVector, DistributionCurve, MomentAdjustment, RefitParameters, ReshapeMethod,
};

/// A reshaped distribution and the probability read from it at the target.
#[derive(Debug, Clone, PartialEq)]
pub struct Reshaped {
    pub pdf: DistributionCurve,
    pub cdf: DistributionCurve,
    pub method: ReshapeMethod,
    pub refit: Option<RefitParameters>,
    pub probability_at_target: f64,
}

/// Produces a reshaped distribution from a baseline and an adjustment.
///
/// The context is needed only by the fallback path when the refit is
/// infeasible.
pub trait Refitter: Send + Sync {
    fn reshape(
        &self,
        baseline: &Baseline,
        adjustment: &MomentAdjustment,
        context: &ContextVector,
    ) -> Reshaped;
}
