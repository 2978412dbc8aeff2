//! Moment adjustments and Beta refit parameters.

use serde::{Deserialize, Serialize};

/// Scalar moment adjustments derived from a context vector.
///
/// `mean_shift` (m0) lies in `[0, 1]`; `variance_shrink` (m1) lies in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentAdjustment {
    pub mean_shift: f64,
    pub variance_shrink: f64,
}

impl MomentAdjustment {
    /// No adjustment: the reshaper passes the baseline through unchanged.
    pub const NEUTRAL: MomentAdjustment = MomentAdjustment {
        mean_shift: 0.0,
        variance_shrink: 0.0,
    };

    pub fn new(mean_shift: f64, variance_shrink: f64) -> Self {
        Self {
            mean_shift: clamp_unit(mean_shift),
            variance_shrink: clamp_unit(variance_shrink),
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.mean_shift == 0.0 && self.variance_shrink == 0.0
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Shape parameters of a Beta distribution on the unit interval, mapped
/// back onto `[optimistic, pessimistic]` by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefitParameters {
    pub alpha: f64,
    pub beta: f64,
}

impl RefitParameters {
    /// Accepts only finite, strictly positive shapes.
    pub fn new(alpha: f64, beta: f64) -> Option<Self> {
        let valid = alpha.is_finite() && beta.is_finite() && alpha > 0.0 && beta > 0.0;
        valid.then_some(Self { alpha, beta })
    }

    /// Unit-interval mean `alpha / (alpha + beta)`.
    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    /// Unit-interval variance.
    pub fn variance(&self) -> f64 {
        let sum = self.alpha + self.beta;
        self.alpha * self.beta / (sum * sum * (sum + 1.0))
    }
}
