//! Input validation errors. These are the only user-visible failures.

use super::error_code::{self, PmcErrorCode};

/// Errors raised while validating a caller's estimation request.
/// Fatal: no computation proceeds once one is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error(
        "estimate out of order: optimistic {optimistic} <= most likely {most_likely} <= pessimistic {pessimistic} is required"
    )]
    OutOfOrder {
        optimistic: f64,
        most_likely: f64,
        pessimistic: f64,
    },

    #[error("estimate range is zero: optimistic and pessimistic are both {value}")]
    ZeroRange { value: f64 },

    #[error("confidence level {value} must lie strictly between 0 and 1")]
    InvalidConfidenceLevel { value: f64 },

    #[error("probe level {value} must be between 1 and 7")]
    InvalidProbeLevel { value: u8 },

    #[error("sample count {value} must be at least {min}")]
    InvalidSampleCount { value: usize, min: usize },

    #[error("context dimension {dimension} has invalid value {value}")]
    InvalidContext { dimension: &'static str, value: f64 },
}

impl PmcErrorCode for InputError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NonFinite { .. } => error_code::NON_FINITE,
            Self::OutOfOrder { .. } => error_code::OUT_OF_ORDER,
            Self::ZeroRange { .. } => error_code::ZERO_RANGE,
            _ => error_code::INPUT_ERROR,
        }
    }
}
