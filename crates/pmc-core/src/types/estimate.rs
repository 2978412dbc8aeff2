//! Three-point (optimistic / most likely / pessimistic) estimate.

use serde::{Deserialize, Serialize};

use crate::constants::PERT_LAMBDA;
use crate::errors::InputError;

/// A validated three-point estimate.
///
/// Invariant: `optimistic <= most_likely <= pessimistic` and the range is
/// strictly positive. Construct through [`ThreePointEstimate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreePointEstimate {
    pub optimistic: f64,
    pub most_likely: f64,
    pub pessimistic: f64,
}

impl ThreePointEstimate {
    /// Validate and build an estimate.
    pub fn new(optimistic: f64, most_likely: f64, pessimistic: f64) -> Result<Self, InputError> {
        let estimate = Self {
            optimistic,
            most_likely,
            pessimistic,
        };
        estimate.validate()?;
        Ok(estimate)
    }

    /// Check the ordering and range invariants.
    ///
    /// Deserialized estimates bypass `new`, so the estimator re-validates
    /// every input with this before doing any work.
    pub fn validate(&self) -> Result<(), InputError> {
        for (field, value) in [
            ("optimistic", self.optimistic),
            ("most_likely", self.most_likely),
            ("pessimistic", self.pessimistic),
        ] {
            if !value.is_finite() {
                return Err(InputError::NonFinite { field });
            }
        }
        if self.optimistic > self.most_likely || self.most_likely > self.pessimistic {
            return Err(InputError::OutOfOrder {
                optimistic: self.optimistic,
                most_likely: self.most_likely,
                pessimistic: self.pessimistic,
            });
        }
        if self.range() <= 0.0 {
            return Err(InputError::ZeroRange {
                value: self.optimistic,
            });
        }
        Ok(())
    }

    /// `pessimistic - optimistic`.
    pub fn range(&self) -> f64 {
        self.pessimistic - self.optimistic
    }

    /// PERT mean: `(O + 4M + P) / 6`.
    pub fn pert_mean(&self) -> f64 {
        (self.optimistic + PERT_LAMBDA * self.most_likely + self.pessimistic)
            / (PERT_LAMBDA + 2.0)
    }

    /// Map a value onto the unit interval spanned by the estimate.
    pub fn to_unit(&self, x: f64) -> f64 {
        (x - self.optimistic) / self.range()
    }

    /// Map a unit-interval value back onto `[optimistic, pessimistic]`.
    pub fn from_unit(&self, u: f64) -> f64 {
        self.optimistic + u * self.range()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pert_mean_symmetric() {
        let e = ThreePointEstimate::new(10.0, 20.0, 30.0).unwrap();
        assert!((e.pert_mean() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_order_rejected() {
        let err = ThreePointEstimate::new(10.0, 40.0, 30.0).unwrap_err();
        assert!(matches!(err, InputError::OutOfOrder { .. }));
    }

    #[test]
    fn test_zero_range_rejected() {
        let err = ThreePointEstimate::new(5.0, 5.0, 5.0).unwrap_err();
        assert_eq!(err, InputError::ZeroRange { value: 5.0 });
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = ThreePointEstimate::new(f64::NAN, 1.0, 2.0).unwrap_err();
        assert_eq!(err, InputError::NonFinite { field: "optimistic" });
    }

    #[test]
    fn test_unit_mapping() {
        let e = ThreePointEstimate::new(100.0, 150.0, 300.0).unwrap();
        assert!((e.to_unit(150.0) - 0.25).abs() < 1e-12);
        assert!((e.from_unit(0.25) - 150.0).abs() < 1e-12);
    }
}
