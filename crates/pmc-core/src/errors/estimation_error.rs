//! Top-level estimation error.

use super::error_code::{self, PmcErrorCode};
use super::{ConfigError, InputError};

/// Errors surfaced by `Estimator::estimate`.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum EstimationError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Time budget of {budget_ms}ms exhausted before task {task_index}")]
    BudgetExhausted { budget_ms: u64, task_index: usize },
}

impl PmcErrorCode for EstimationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Input(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::BudgetExhausted { .. } => error_code::BUDGET_EXHAUSTED,
        }
    }
}
