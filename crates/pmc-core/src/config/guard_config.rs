//! Divergence and regression guard configuration.

use serde::{Deserialize, Serialize};

/// Whether the KL ceiling rejects candidates or is only reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KlGateMode {
    /// Candidates above the ceiling are infeasible.
    #[default]
    Strict,
    /// The ceiling is only surfaced in diagnostics.
    Diagnostic,
}

/// Configuration for the divergence gate and the regression guard.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GuardConfig {
    /// KL acceptance ceiling. Default: 0.08.
    pub kl_ceiling: Option<f64>,
    /// Gate mode. Default: strict.
    pub kl_gate: Option<KlGateMode>,
    /// Material regression tolerance. Default: 1e-4.
    pub regression_tolerance: Option<f64>,
    /// Minimum gain for `status = ok`. Default: 1e-6.
    pub improvement_epsilon: Option<f64>,
}

impl GuardConfig {
    pub fn effective_kl_ceiling(&self) -> f64 {
        self.kl_ceiling.unwrap_or(0.08)
    }

    pub fn effective_kl_gate(&self) -> KlGateMode {
        self.kl_gate.unwrap_or_default()
    }

    pub fn effective_regression_tolerance(&self) -> f64 {
        self.regression_tolerance.unwrap_or(1e-4)
    }

    pub fn effective_improvement_epsilon(&self) -> f64 {
        self.improvement_epsilon.unwrap_or(1e-6)
    }
}
