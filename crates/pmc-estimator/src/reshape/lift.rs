//! Bounded monotone CDF lift, used when a refit is infeasible.

use pmc_core::constants::{LIFT_BLEND_CAP, LIFT_GAIN_SCALE};
use pmc_core::types::{ContextVector, CurvePoint, DistributionCurve};

use crate::moments::mapper::signed_blend;
use crate::numeric::{clean_cdf, normalize_area};

/// `0.25 · clamp(Σ signedᵢ·rᵢ, −0.25, 0.25)`.
pub fn lift_gain(context: &ContextVector) -> f64 {
    let blend = signed_blend(context);
    let blend = if blend.is_finite() { blend } else { 0.0 };
    LIFT_GAIN_SCALE * blend.clamp(-LIFT_BLEND_CAP, LIFT_BLEND_CAP)
}

/// `F'(x) = F(x) + gain·(1 − F(x))`, clamped and cleaned.
///
/// The first point keeps its baseline value so the lifted mass enters over
/// the first grid interval instead of as an atom at the lower bound.
pub fn lift_cdf(cdf: &DistributionCurve, gain: f64) -> DistributionCurve {
    let points = cdf
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| CurvePoint {
            x: p.x,
            y: if i == 0 {
                p.y
            } else {
                (p.y + gain * (1.0 - p.y)).clamp(0.0, 1.0)
            },
        })
        .collect();
    clean_cdf(points)
}

/// PDF from the local slope of a CDF, normalized to unit area.
///
/// Central differences inside and a one-sided slope at the upper end. Node 1
/// looks forward only, and node 0 is chosen so the first interval integrates
/// to exactly `F(x₁) − F(x₀)`; a steep first interval stays in that interval.
pub fn pdf_from_cdf(cdf: &DistributionCurve) -> Option<DistributionCurve> {
    let pts = cdf.points();
    let n = pts.len();
    if n < 2 {
        return None;
    }
    let slope = |a: &CurvePoint, b: &CurvePoint| {
        let dx = b.x - a.x;
        if dx > 0.0 {
            ((b.y - a.y) / dx).max(0.0)
        } else {
            0.0
        }
    };

    let xs = cdf.xs();
    let mut ys: Vec<f64> = (0..n)
        .map(|i| match i {
            0 => 0.0,
            i if i == n - 1 => slope(&pts[n - 2], &pts[n - 1]),
            1 => slope(&pts[1], &pts[2]),
            i => slope(&pts[i - 1], &pts[i + 1]),
        })
        .collect();
    let first_dx = pts[1].x - pts[0].x;
    if first_dx > 0.0 {
        let first_mass = (pts[1].y - pts[0].y).max(0.0);
        ys[0] = (2.0 * first_mass / first_dx - ys[1]).max(0.0);
    }
    if !normalize_area(&xs, &mut ys) {
        return None;
    }
    Some(DistributionCurve::from_xy(&xs, &ys))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{linspace, trapezoid};

    #[test]
    fn test_gain_bounded() {
        let full = ContextVector::from_unit(&[1.0; 7]);
        // 0.2 + 0.2 + 0.18 + 0.15 − 0.10 + 0.09 + 0.08 = 0.80, capped at 0.25.
        assert!((lift_gain(&full) - 0.0625).abs() < 1e-12);

        let mut rework_only = ContextVector::ZERO;
        rework_only.rework_percentage = 50.0;
        assert!((lift_gain(&rework_only) + 0.025).abs() < 1e-12);
        assert_eq!(lift_gain(&ContextVector::ZERO), 0.0);
    }

    #[test]
    fn test_lift_is_monotone_and_dominates() {
        let xs = linspace(0.0, 1.0, 11);
        let cdf = DistributionCurve::from_xy(&xs, &xs);
        let lifted = lift_cdf(&cdf, 0.0625);
        for (a, b) in cdf.points().iter().zip(lifted.points()) {
            assert!(b.y >= a.y);
        }
        assert_eq!(lifted.last().unwrap().y, 1.0);
        assert!(lifted.ys().windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_pdf_from_uniform_cdf() {
        let xs = linspace(0.0, 2.0, 21);
        let ys: Vec<f64> = xs.iter().map(|x| x / 2.0).collect();
        let pdf = pdf_from_cdf(&DistributionCurve::from_xy(&xs, &ys)).unwrap();
        assert!((trapezoid(&pdf.xs(), &pdf.ys()) - 1.0).abs() < 1e-12);
        assert!(pdf.ys().iter().all(|&y| (y - 0.5).abs() < 1e-9));
    }

    #[test]
    fn test_lift_keeps_lower_bound_anchored() {
        let xs = linspace(0.0, 1.0, 11);
        let lifted = lift_cdf(&DistributionCurve::from_xy(&xs, &xs), 0.0625);
        assert_eq!(lifted.first().unwrap().y, 0.0);
        assert!((lifted.points()[1].y - (0.1 + 0.0625 * 0.9)).abs() < 1e-12);
    }

    #[test]
    fn test_lifted_pdf_carries_lifted_mass() {
        use crate::baseline::PertBaselineProvider;
        use crate::divergence::KlDivergence;
        use pmc_core::traits::{BaselineProvider, BaselineRequest, DivergenceMeasure};
        use pmc_core::types::ThreePointEstimate;

        let baseline = PertBaselineProvider::default()
            .build(&BaselineRequest {
                estimate: ThreePointEstimate::new(1000.0, 1010.0, 1020.0).unwrap(),
                target: 1010.0,
                confidence_level: 0.9,
                sample_count: 1000,
            })
            .unwrap();
        let lifted = lift_cdf(&baseline.cdf, 0.0625);
        let pdf = pdf_from_cdf(&lifted).unwrap();

        let xs = pdf.xs();
        let ys = pdf.ys();
        let k = xs.iter().position(|&x| x >= 1010.0).unwrap();
        let mass = trapezoid(&xs[..=k], &ys[..=k]);
        let claimed = lifted.points()[k].y;
        assert!((mass - claimed).abs() < 5e-3, "pdf mass {mass}, cdf {claimed}");

        let kl = KlDivergence::new().divergence(&pdf, &baseline.pdf);
        assert!(kl > 0.01, "lift invisible to divergence: {kl}");
    }
}
