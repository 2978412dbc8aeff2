//! Per-dimension search box in unit coordinates.

use pmc_core::constants::{DIMENSIONS, SIGNED_WEIGHTS};
use pmc_core::types::Dimension;

/// Upper bound for dimensions that widen the distribution.
pub const NEGATIVE_WEIGHT_UPPER: f64 = 0.7;
/// Rework runs on half the slider range.
pub const REWORK_UPPER: f64 = 0.5;

/// Axis-aligned box the search stays inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchBounds {
    pub lower: [f64; DIMENSIONS],
    pub upper: [f64; DIMENSIONS],
}

impl SearchBounds {
    /// Default box: `[0, 1]`, tightened to 0.7 where the signed weight is
    /// negative, rework further capped at 0.5.
    pub fn standard() -> Self {
        let mut upper = [1.0; DIMENSIONS];
        for dim in Dimension::ALL {
            let i = dim.index();
            if SIGNED_WEIGHTS[i] < 0.0 {
                upper[i] = NEGATIVE_WEIGHT_UPPER;
            }
            if dim == Dimension::ReworkPercentage {
                upper[i] = upper[i].min(REWORK_UPPER);
            }
        }
        Self {
            lower: [0.0; DIMENSIONS],
            upper,
        }
    }

    pub fn width(&self, i: usize) -> f64 {
        self.upper[i] - self.lower[i]
    }

    /// Clamp every coordinate into the box; NaN maps to the lower bound.
    pub fn clamp(&self, x: &[f64; DIMENSIONS]) -> [f64; DIMENSIONS] {
        let mut out = *x;
        for (i, v) in out.iter_mut().enumerate() {
            *v = if v.is_nan() {
                self.lower[i]
            } else {
                v.clamp(self.lower[i], self.upper[i])
            };
        }
        out
    }

    pub fn contains(&self, x: &[f64; DIMENSIONS]) -> bool {
        x.iter()
            .enumerate()
            .all(|(i, &v)| v >= self.lower[i] && v <= self.upper[i])
    }
}

impl Default for SearchBounds {
    fn default() -> Self {
        Self::standard()
    }
}
