//! `MomentMapper` implementation: copula blend averaged with a signed
//! constraint pair.

use pmc_core::constants::{DIMENSIONS, SIGNED_WEIGHTS};
use pmc_core::traits::MomentMapper;
use pmc_core::types::{ContextVector, MomentAdjustment};

use super::copula;
use crate::numeric::clamp01;

/// Every intermediate of one mapping, for diagnostics and reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentBreakdown {
    pub linear: f64,
    pub probabilistic_or: f64,
    pub coupling: f64,
    /// Blend weight `t` between the linear and probabilistic-OR aggregates.
    pub blend: f64,
    pub copula: MomentPair,
    /// Signed blend `Σ signedᵢ·rᵢ`.
    pub signed_blend: f64,
    pub constraint: MomentPair,
    pub adjustment: MomentAdjustment,
}

/// Unclamped `(m0, m1)` pair from one branch of the mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentPair {
    pub mean_shift: f64,
    pub variance_shrink: f64,
}

/// Maps contexts to moments through the fixed correlation structure.
#[derive(Debug, Clone)]
pub struct CopulaMomentMapper {
    /// Multiplier on the copula mean shift. Fixed at 1.
    scale: f64,
}

impl CopulaMomentMapper {
    pub fn new() -> Self {
        Self { scale: 1.0 }
    }

    /// Full breakdown. `None` for an all-zero context, which maps to no
    /// adjustment at all.
    pub fn explain(&self, context: &ContextVector, coefficient_of_variation: f64) -> Option<MomentBreakdown> {
        if context.is_zero() {
            return None;
        }
        let s = copula::strengths(context);
        let linear = copula::linear_aggregate(&s);
        let por = copula::probabilistic_or(&s);
        let coupling = copula::coupling(&s);

        let blend = clamp01(0.3 + 0.4 * coupling);
        let cv = if coefficient_of_variation.is_finite() {
            coefficient_of_variation.max(0.0)
        } else {
            0.0
        };
        let copula = MomentPair {
            mean_shift: self.scale * ((1.0 - blend) * linear + blend * por),
            variance_shrink: ((0.8 - 0.5 * linear) * (1.0 + cv / 2.0)).max(0.0),
        };

        let signed_blend = signed_blend(context);
        let bounded = clamp01(signed_blend);
        let constraint = MomentPair {
            mean_shift: 0.5 * bounded,
            variance_shrink: 0.3 * bounded,
        };

        let adjustment = MomentAdjustment::new(
            0.5 * (copula.mean_shift + constraint.mean_shift),
            0.5 * (copula.variance_shrink + constraint.variance_shrink),
        );

        Some(MomentBreakdown {
            linear,
            probabilistic_or: por,
            coupling,
            blend,
            copula,
            signed_blend,
            constraint,
            adjustment,
        })
    }
}

impl Default for CopulaMomentMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl MomentMapper for CopulaMomentMapper {
    fn map(&self, context: &ContextVector, coefficient_of_variation: f64) -> MomentAdjustment {
        self.explain(context, coefficient_of_variation)
            .map(|b| b.adjustment)
            .unwrap_or(MomentAdjustment::NEUTRAL)
    }
}

/// `Σ signedᵢ·rᵢ` with `rᵢ = raw / max` per dimension.
pub fn signed_blend(context: &ContextVector) -> f64 {
    let r = context.normalized();
    (0..DIMENSIONS).map(|i| SIGNED_WEIGHTS[i] * r[i]).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typical() -> ContextVector {
        ContextVector {
            budget_flexibility: 65.0,
            schedule_flexibility: 65.0,
            scope_certainty: 60.0,
            scope_reduction_allowance: 30.0,
            rework_percentage: 10.0,
            risk_tolerance: 50.0,
            user_confidence: 60.0,
        }
    }

    #[test]
    fn test_zero_context_is_neutral() {
        let m = CopulaMomentMapper::new().map(&ContextVector::ZERO, 1.0);
        assert_eq!(m, MomentAdjustment::NEUTRAL);
        assert_eq!(m.mean_shift, 0.0);
    }

    #[test]
    fn test_adjustment_in_range() {
        let m = CopulaMomentMapper::new().map(&typical(), 1.0);
        assert!(m.mean_shift > 0.0 && m.mean_shift <= 1.0);
        assert!(m.variance_shrink >= 0.0 && m.variance_shrink <= 1.0);
    }

    #[test]
    fn test_mapping_is_pure() {
        let mapper = CopulaMomentMapper::new();
        let a = mapper.map(&typical(), 0.8);
        let b = mapper.map(&typical(), 0.8);
        assert_eq!(a, b);
    }

    #[test]
    fn test_more_rework_lowers_signed_blend() {
        let mut heavy = typical();
        heavy.rework_percentage = 50.0;
        assert!(signed_blend(&heavy) < signed_blend(&typical()));
    }

    #[test]
    fn test_breakdown_is_half_and_half() {
        let b = CopulaMomentMapper::new().explain(&typical(), 0.5).unwrap();
        let expected = 0.5 * (b.copula.mean_shift + b.constraint.mean_shift);
        assert!((b.adjustment.mean_shift - expected.clamp(0.0, 1.0)).abs() < 1e-12);
        assert!(b.blend >= 0.3 && b.blend <= 0.7);
        assert!(b.probabilistic_or >= b.linear);
    }

    #[test]
    fn test_higher_cv_inflates_variance_moment() {
        let mapper = CopulaMomentMapper::new();
        let low = mapper.map(&typical(), 0.2).variance_shrink;
        let high = mapper.map(&typical(), 1.5).variance_shrink;
        assert!(high > low);
    }
}
