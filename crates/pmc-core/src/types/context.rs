//! The 7-dimensional context ("slider") vector.

use serde::{Deserialize, Serialize};

use crate::constants::DIMENSIONS;
use crate::errors::InputError;

/// Context dimensions in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    BudgetFlexibility,
    ScheduleFlexibility,
    ScopeCertainty,
    ScopeReductionAllowance,
    ReworkPercentage,
    RiskTolerance,
    UserConfidence,
}

impl Dimension {
    /// All 7 dimensions in canonical order.
    pub const ALL: [Dimension; DIMENSIONS] = [
        Self::BudgetFlexibility,
        Self::ScheduleFlexibility,
        Self::ScopeCertainty,
        Self::ScopeReductionAllowance,
        Self::ReworkPercentage,
        Self::RiskTolerance,
        Self::UserConfidence,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::BudgetFlexibility => "budgetFlexibility",
            Self::ScheduleFlexibility => "scheduleFlexibility",
            Self::ScopeCertainty => "scopeCertainty",
            Self::ScopeReductionAllowance => "scopeReductionAllowance",
            Self::ReworkPercentage => "reworkPercentage",
            Self::RiskTolerance => "riskTolerance",
            Self::UserConfidence => "userConfidence",
        }
    }

    /// Position in the canonical order.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Upper end of the raw slider domain. Rework runs on half the range.
    pub fn max_raw(&self) -> f64 {
        match self {
            Self::ReworkPercentage => 50.0,
            _ => 100.0,
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw slider positions: six dimensions on `[0, 100]`, rework on `[0, 50]`.
///
/// Search components work in unit coordinates (`raw = 100 * x`), so
/// rework's unit cap is 0.5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextVector {
    pub budget_flexibility: f64,
    pub schedule_flexibility: f64,
    pub scope_certainty: f64,
    pub scope_reduction_allowance: f64,
    pub rework_percentage: f64,
    pub risk_tolerance: f64,
    pub user_confidence: f64,
}

impl ContextVector {
    /// All-zero context: no adjustment to the baseline.
    pub const ZERO: ContextVector = ContextVector {
        budget_flexibility: 0.0,
        schedule_flexibility: 0.0,
        scope_certainty: 0.0,
        scope_reduction_allowance: 0.0,
        rework_percentage: 0.0,
        risk_tolerance: 0.0,
        user_confidence: 0.0,
    };

    pub fn from_array(raw: [f64; DIMENSIONS]) -> Self {
        Self {
            budget_flexibility: raw[0],
            schedule_flexibility: raw[1],
            scope_certainty: raw[2],
            scope_reduction_allowance: raw[3],
            rework_percentage: raw[4],
            risk_tolerance: raw[5],
            user_confidence: raw[6],
        }
    }

    pub fn as_array(&self) -> [f64; DIMENSIONS] {
        [
            self.budget_flexibility,
            self.schedule_flexibility,
            self.scope_certainty,
            self.scope_reduction_allowance,
            self.rework_percentage,
            self.risk_tolerance,
            self.user_confidence,
        ]
    }

    pub fn get(&self, dim: Dimension) -> f64 {
        self.as_array()[dim.index()]
    }

    pub fn set(&mut self, dim: Dimension, value: f64) {
        let mut raw = self.as_array();
        raw[dim.index()] = value;
        *self = Self::from_array(raw);
    }

    /// True when every dimension is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.as_array().iter().all(|&v| v == 0.0)
    }

    /// Build from unit search coordinates, clamping into each raw domain.
    pub fn from_unit(unit: &[f64; DIMENSIONS]) -> Self {
        let mut raw = [0.0; DIMENSIONS];
        for (i, dim) in Dimension::ALL.iter().enumerate() {
            raw[i] = (unit[i] * 100.0).clamp(0.0, dim.max_raw());
        }
        Self::from_array(raw)
    }

    /// Unit search coordinates (`raw / 100`).
    pub fn to_unit(&self) -> [f64; DIMENSIONS] {
        self.as_array().map(|v| v / 100.0)
    }

    /// Each dimension divided by its raw maximum, clamped to `[0, 1]`.
    pub fn normalized(&self) -> [f64; DIMENSIONS] {
        let raw = self.as_array();
        let mut out = [0.0; DIMENSIONS];
        for (i, dim) in Dimension::ALL.iter().enumerate() {
            let v = raw[i] / dim.max_raw();
            out[i] = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        }
        out
    }

    /// Reject non-finite or out-of-domain slider values.
    pub fn validate(&self) -> Result<(), InputError> {
        for dim in Dimension::ALL {
            let value = self.get(dim);
            if !value.is_finite() || value < 0.0 || value > dim.max_raw() {
                return Err(InputError::InvalidContext {
                    dimension: dim.name(),
                    value,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rework_is_half_range() {
        let v = ContextVector::from_unit(&[1.0; DIMENSIONS]);
        assert_eq!(v.rework_percentage, 50.0);
        assert_eq!(v.budget_flexibility, 100.0);
        assert_eq!(v.normalized(), [1.0; DIMENSIONS]);
    }

    #[test]
    fn test_set_and_get() {
        let mut v = ContextVector::ZERO;
        v.set(Dimension::RiskTolerance, 42.0);
        assert_eq!(v.get(Dimension::RiskTolerance), 42.0);
        assert_eq!(v.risk_tolerance, 42.0);
        assert!(!v.is_zero());
    }

    #[test]
    fn test_validate_rejects_rework_above_fifty() {
        let mut v = ContextVector::ZERO;
        v.rework_percentage = 60.0;
        let err = v.validate().unwrap_err();
        assert_eq!(
            err,
            InputError::InvalidContext {
                dimension: "reworkPercentage",
                value: 60.0
            }
        );
    }

    #[test]
    fn test_serde_camel_case() {
        let json = serde_json::to_value(ContextVector::ZERO).unwrap();
        assert!(json.get("scopeReductionAllowance").is_some());
    }
}
