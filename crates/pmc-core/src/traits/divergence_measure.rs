//! Divergence measurement seam.

use crate::types::DistributionCurve;

/// Information divergence of a candidate PDF from a baseline PDF.
/// Always finite and non-negative.
pub trait DivergenceMeasure: Send + Sync {
    fn divergence(&self, candidate: &DistributionCurve, baseline: &DistributionCurve) -> f64;
}
