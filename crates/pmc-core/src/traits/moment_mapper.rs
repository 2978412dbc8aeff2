//! Context-to-moment mapping seam.

use crate::types::{ContextVector, MomentAdjustment};

/// Maps a raw context vector to moment adjustments.
///
/// Must be pure: search and manual paths call it identically so a given
/// context always reproduces the same adjustment.
pub trait MomentMapper: Send + Sync {
    fn map(&self, context: &ContextVector, coefficient_of_variation: f64) -> MomentAdjustment;
}
