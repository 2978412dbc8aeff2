//! Terminal artifact of one estimation run.

use serde::{Deserialize, Serialize};

use super::{ContextVector, DistributionCurve, MomentAdjustment, RefitParameters};

/// Outcome classification of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// Probability improved, or a promoted floor candidate was used.
    Ok,
    /// Nothing better than the baseline was found (or optimization was off).
    NoOptimize,
    /// The optimized result regressed and was discarded for the baseline.
    Reverted,
    /// A caller-supplied context was applied.
    Manual,
    /// A caller-supplied context regressed and was discarded.
    ManualReverted,
    /// The task failed validation or was skipped (batch mode only).
    Error,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NoOptimize => "no-optimize",
            Self::Reverted => "reverted",
            Self::Manual => "manual",
            Self::ManualReverted => "manual-reverted",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which path produced the final distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReshapeMethod {
    /// Baseline returned unchanged.
    PassThrough,
    /// Method-of-moments Beta refit.
    BetaRefit,
    /// Bounded monotone CDF lift (refit was infeasible).
    CdfLift,
}

/// Conditions the engine recovered from instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recovery {
    /// Refit shapes were non-positive; the CDF lift was used.
    RefitInfeasible,
    /// No feasible candidate beat the baseline; the floor vector was promoted.
    SearchInfeasible,
    /// Candidates rejected by the divergence ceiling.
    DivergenceExceeded { rejected: usize, ceiling: f64 },
    /// The optimized probability regressed and the baseline was restored.
    RegressionGuard { attempted: f64, baseline: f64 },
}

/// States an optimization passes through on its way to a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Searching,
    Candidate,
    Feasible,
    Reshaped,
    RegressionCheck,
    Accepted,
    Reverted,
}

/// Counters describing how the search went.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDiagnostics {
    /// Objective evaluations across every stage.
    pub evaluations: usize,
    pub warm_start_score: Option<f64>,
    pub global_best_score: Option<f64>,
    pub local_iterations: usize,
    pub floor_promoted: bool,
    pub adaptive: bool,
    /// Candidates rejected by the divergence ceiling.
    pub divergence_rejections: usize,
}

/// Final, immutable output of one estimation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    /// Chosen context, or all zero when nothing was applied.
    pub sliders: ContextVector,
    pub reshaped_pdf: DistributionCurve,
    pub reshaped_cdf: DistributionCurve,
    pub baseline_probability: f64,
    pub final_probability: f64,
    /// KL divergence of the final PDF from the baseline PDF.
    pub divergence: f64,
    pub divergence_exceeded: bool,
    pub status: Status,
    pub narrative: String,
    pub reshape_method: ReshapeMethod,
    pub moments: MomentAdjustment,
    pub refit: Option<RefitParameters>,
    pub confidence_level: f64,
    pub baseline_value_at_confidence: f64,
    pub final_value_at_confidence: f64,
    pub recoveries: Vec<Recovery>,
    pub stages: Vec<Stage>,
    pub search: Option<SearchDiagnostics>,
}

impl OptimizationResult {
    /// Placeholder result for a batch task that could not run.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            sliders: ContextVector::ZERO,
            reshaped_pdf: DistributionCurve::default(),
            reshaped_cdf: DistributionCurve::default(),
            baseline_probability: 0.0,
            final_probability: 0.0,
            divergence: 0.0,
            divergence_exceeded: false,
            status: Status::Error,
            narrative: message.into(),
            reshape_method: ReshapeMethod::PassThrough,
            moments: MomentAdjustment::NEUTRAL,
            refit: None,
            confidence_level: 0.0,
            baseline_value_at_confidence: 0.0,
            final_value_at_confidence: 0.0,
            recoveries: Vec::new(),
            stages: Vec::new(),
            search: None,
        }
    }

    /// Probability gained over the baseline (never negative).
    pub fn improvement(&self) -> f64 {
        self.final_probability - self.baseline_probability
    }
}
