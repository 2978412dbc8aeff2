//! Baseline construction seam.

use crate::errors::InputError;
use crate::types::{Baseline, ThreePointEstimate};

/// Everything a baseline builder needs from the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineRequest {
    pub estimate: ThreePointEstimate,
    pub target: f64,
    /// Used for the empirical percentile interval.
    pub confidence_level: f64,
    /// Monte Carlo draws for the smoothed and empirical modes.
    pub sample_count: usize,
}

/// Builds the baseline distribution for an estimate.
///
/// Fails only on invalid input; the error must propagate as a hard stop.
pub trait BaselineProvider: Send + Sync {
    fn build(&self, request: &BaselineRequest) -> Result<Baseline, InputError>;
}
