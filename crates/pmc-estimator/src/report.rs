//! Reporting helpers: contribution breakdown, storage records, narrative.

use pmc_core::config::StorageConfig;
use pmc_core::constants::SIGNED_WEIGHTS;
use pmc_core::types::{
    ContextVector, CurvePoint, Dimension, DistributionCurve, OptimizationResult, Status,
};
use serde::{Deserialize, Serialize};

/// One dimension's part in the signed blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub dimension: Dimension,
    /// `raw / max`.
    pub normalized: f64,
    pub weight: f64,
    /// `weight · normalized`.
    pub contribution: f64,
    /// Fraction of `Σ |contribution|`; zero when every contribution is zero.
    pub share: f64,
}

/// Per-dimension contributions in canonical order.
pub fn contributions(context: &ContextVector) -> Vec<Contribution> {
    let r = context.normalized();
    let raw: Vec<f64> = (0..r.len()).map(|i| SIGNED_WEIGHTS[i] * r[i]).collect();
    let total: f64 = raw.iter().map(|c| c.abs()).sum();
    Dimension::ALL
        .iter()
        .map(|&dimension| {
            let i = dimension.index();
            Contribution {
                dimension,
                normalized: r[i],
                weight: SIGNED_WEIGHTS[i],
                contribution: raw[i],
                share: if total > 0.0 { raw[i].abs() / total } else { 0.0 },
            }
        })
        .collect()
}

/// A result flattened for a spreadsheet row or a JSON store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageRecord {
    pub status: Status,
    pub sliders: ContextVector,
    pub baseline_probability: f64,
    pub final_probability: f64,
    pub divergence: f64,
    pub confidence_level: f64,
    pub baseline_value_at_confidence: f64,
    pub final_value_at_confidence: f64,
    pub pdf: DistributionCurve,
    pub cdf: DistributionCurve,
    pub narrative: String,
}

impl StorageRecord {
    pub fn from_result(result: &OptimizationResult, config: &StorageConfig) -> Self {
        let max_points = config.effective_max_points();
        let decimals = config.effective_decimals();
        let r = |v: f64| round_to(v, decimals);
        let sliders = ContextVector::from_array(result.sliders.as_array().map(r));
        Self {
            status: result.status,
            sliders,
            baseline_probability: r(result.baseline_probability),
            final_probability: r(result.final_probability),
            divergence: r(result.divergence),
            confidence_level: r(result.confidence_level),
            baseline_value_at_confidence: r(result.baseline_value_at_confidence),
            final_value_at_confidence: r(result.final_value_at_confidence),
            pdf: downsample(&result.reshaped_pdf, max_points, decimals),
            cdf: downsample(&result.reshaped_cdf, max_points, decimals),
            narrative: result.narrative.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

/// At most `max_points` evenly picked points, both endpoints kept, rounded.
pub fn downsample(curve: &DistributionCurve, max_points: usize, decimals: u32) -> DistributionCurve {
    let pts = curve.points();
    let keep = max_points.max(2);
    let picked: Vec<CurvePoint> = if pts.len() <= keep {
        pts.to_vec()
    } else {
        let last = pts.len() - 1;
        (0..keep)
            .map(|i| pts[((i * last) as f64 / (keep - 1) as f64).round() as usize])
            .collect()
    };
    DistributionCurve::new(
        picked
            .into_iter()
            .map(|p| CurvePoint {
                x: round_to(p.x, decimals),
                y: round_to(p.y, decimals),
            })
            .collect(),
    )
}

/// One-line summary of a run.
pub fn narrative(
    status: Status,
    baseline_probability: f64,
    final_probability: f64,
    divergence: f64,
) -> String {
    let delta = (final_probability - baseline_probability) * 100.0;
    format!(
        "{status}: P(target) {:.1}% -> {:.1}% ({delta:+.1} pts), KL {divergence:.4}",
        baseline_probability * 100.0,
        final_probability * 100.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::linspace;

    #[test]
    fn test_contributions_shares_sum_to_one() {
        let c = ContextVector::from_unit(&[0.5; 7]);
        let parts = contributions(&c);
        assert_eq!(parts.len(), 7);
        let total: f64 = parts.iter().map(|p| p.share).sum();
        assert!((total - 1.0).abs() < 1e-12);
        let rework = &parts[Dimension::ReworkPercentage.index()];
        assert!(rework.contribution < 0.0);
    }

    #[test]
    fn test_contributions_zero_context() {
        assert!(contributions(&ContextVector::ZERO)
            .iter()
            .all(|p| p.share == 0.0 && p.contribution == 0.0));
    }

    #[test]
    fn test_downsample_keeps_endpoints() {
        let xs = linspace(0.0, 1.0, 1000);
        let curve = DistributionCurve::from_xy(&xs, &xs);
        let small = downsample(&curve, 100, 6);
        assert_eq!(small.len(), 100);
        assert_eq!(small.first().unwrap().x, 0.0);
        assert_eq!(small.last().unwrap().x, 1.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123_456_789, 4), 0.1235);
        assert_eq!(round_to(2.5, 0), 3.0);
    }

    #[test]
    fn test_narrative_format() {
        let s = narrative(Status::Ok, 0.5, 0.62, 0.031);
        assert_eq!(s, "ok: P(target) 50.0% -> 62.0% (+12.0 pts), KL 0.0310");
    }
}
