//! Baseline distribution built from a three-point estimate.

use serde::{Deserialize, Serialize};

use super::{DistributionCurve, RefitParameters, ThreePointEstimate};

/// How the baseline PDF/CDF is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineMode {
    /// Canonical PERT Beta evaluated on a dense grid.
    #[default]
    Pert,
    /// PERT Beta grid mixed with a kernel-smoothed Monte Carlo sample.
    PertSmoothed,
    /// Empirical distribution from triangular(O, M, P) samples.
    TriangularMonteCarlo,
}

impl BaselineMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pert => "pert",
            Self::PertSmoothed => "pert_smoothed",
            Self::TriangularMonteCarlo => "triangular_monte_carlo",
        }
    }
}

impl std::str::FromStr for BaselineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pert" => Ok(Self::Pert),
            "pert_smoothed" => Ok(Self::PertSmoothed),
            "triangular_monte_carlo" => Ok(Self::TriangularMonteCarlo),
            other => Err(format!("unknown baseline mode '{other}'")),
        }
    }
}

/// Baseline distribution plus the derived scalars every later stage reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baseline {
    pub estimate: ThreePointEstimate,
    pub mode: BaselineMode,
    /// Target value the probability `p0` is read at.
    pub target: f64,
    pub pdf: DistributionCurve,
    pub cdf: DistributionCurve,
    /// Canonical Beta shapes. `None` for the empirical triangular mode.
    pub shape: Option<RefitParameters>,
    /// `(O + 4M + P) / 6`.
    pub pert_mean: f64,
    /// Distribution mean (PERT mean for Beta modes, sample mean otherwise).
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    /// `(P - O) / mean`.
    pub coefficient_of_variation: f64,
    /// `(mean - target) / std_dev`.
    pub skew: f64,
    /// `F(target)`.
    pub probability_at_target: f64,
    /// Percentile interval at the requested confidence (empirical mode only).
    pub confidence_interval: Option<(f64, f64)>,
    /// Fraction of samples at or below the target (empirical mode only).
    pub empirical_probability: Option<f64>,
}
