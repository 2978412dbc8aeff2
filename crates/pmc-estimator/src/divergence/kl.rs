//! KL divergence between sampled PDFs on a shared grid.

use pmc_core::constants::DENSITY_FLOOR;
use pmc_core::traits::DivergenceMeasure;
use pmc_core::types::DistributionCurve;

use crate::numeric::{linspace, normalize_area, trapezoid};

/// Upper bound on shared-grid size.
pub const MAX_GRID_POINTS: usize = 4000;
/// Grid intervals used when neither curve has a usable native spacing.
const FALLBACK_INTERVALS: f64 = 200.0;

/// `KL(p ‖ q) = ∫ p·ln(p/q) dx`, trapezoid rule on a shared grid.
#[derive(Debug, Clone)]
pub struct KlDivergence {
    floor: f64,
    max_points: usize,
}

impl KlDivergence {
    pub fn new() -> Self {
        Self {
            floor: DENSITY_FLOOR,
            max_points: MAX_GRID_POINTS,
        }
    }

    /// Shared grid covering both supports at half the finer native spacing.
    pub fn shared_grid(&self, p: &DistributionCurve, q: &DistributionCurve) -> Option<Vec<f64>> {
        let lo = p.first()?.x.min(q.first()?.x);
        let hi = p.last()?.x.max(q.last()?.x);
        let span = hi - lo;
        if !(span > 0.0 && span.is_finite()) {
            return None;
        }
        let step = [p.native_spacing(), q.native_spacing()]
            .into_iter()
            .flatten()
            .reduce(f64::min)
            .map(|s| 0.5 * s)
            .unwrap_or(span / FALLBACK_INTERVALS);
        let intervals = (span / step).ceil();
        let points = if intervals.is_finite() {
            (intervals as usize + 1).clamp(2, self.max_points)
        } else {
            self.max_points
        };
        Some(linspace(lo, hi, points))
    }
}

impl Default for KlDivergence {
    fn default() -> Self {
        Self::new()
    }
}

impl DivergenceMeasure for KlDivergence {
    fn divergence(&self, candidate: &DistributionCurve, baseline: &DistributionCurve) -> f64 {
        if candidate == baseline {
            return 0.0;
        }
        let Some(grid) = self.shared_grid(candidate, baseline) else {
            return 0.0;
        };

        let mut p: Vec<f64> = grid.iter().map(|&x| density_at(candidate, x)).collect();
        let mut q: Vec<f64> = grid.iter().map(|&x| density_at(baseline, x)).collect();
        if !normalize_area(&grid, &mut p) {
            return 0.0;
        }
        // A zero-area baseline stays zero; the floor then dominates.
        normalize_area(&grid, &mut q);

        let integrand: Vec<f64> = p
            .iter()
            .zip(&q)
            .map(|(&pi, &qi)| {
                let pi = pi.max(self.floor);
                let qi = qi.max(self.floor);
                pi * (pi / qi).ln()
            })
            .collect();
        let kl = trapezoid(&grid, &integrand);
        if kl.is_finite() {
            kl.max(0.0)
        } else {
            f64::MAX
        }
    }
}

/// Linear interpolation of a density, zero outside its support.
pub fn density_at(pdf: &DistributionCurve, x: f64) -> f64 {
    let pts = pdf.points();
    let (Some(first), Some(last)) = (pts.first(), pts.last()) else {
        return 0.0;
    };
    if x < first.x || x > last.x {
        return 0.0;
    }
    let hi = pts.partition_point(|p| p.x < x);
    if hi == 0 {
        return first.y.max(0.0);
    }
    if hi >= pts.len() {
        return last.y.max(0.0);
    }
    let (a, b) = (pts[hi - 1], pts[hi]);
    let dx = b.x - a.x;
    let y = if dx > 0.0 {
        a.y + (b.y - a.y) * (x - a.x) / dx
    } else {
        b.y
    };
    y.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::linspace;

    fn gaussian(mean: f64, sd: f64) -> DistributionCurve {
        let xs = linspace(-10.0, 10.0, 401);
        let ys: Vec<f64> = xs
            .iter()
            .map(|x| {
                let z = (x - mean) / sd;
                (-0.5 * z * z).exp()
            })
            .collect();
        DistributionCurve::from_xy(&xs, &ys)
    }

    #[test]
    fn test_self_divergence_zero() {
        let p = gaussian(0.0, 1.0);
        assert_eq!(KlDivergence::new().divergence(&p, &p), 0.0);
        let copy = gaussian(0.0, 1.0);
        assert!(KlDivergence::new().divergence(&copy, &p).abs() < 1e-12);
    }

    #[test]
    fn test_shifted_gaussian_matches_closed_form() {
        // KL(N(μ,1) ‖ N(0,1)) = μ² / 2
        let kl = KlDivergence::new().divergence(&gaussian(0.5, 1.0), &gaussian(0.0, 1.0));
        assert!((kl - 0.125).abs() < 2e-3, "kl {kl}");
    }

    #[test]
    fn test_disjoint_support_large_but_finite() {
        let a = DistributionCurve::from_xy(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]);
        let b = DistributionCurve::from_xy(&[5.0, 6.0, 7.0], &[0.0, 1.0, 0.0]);
        let kl = KlDivergence::new().divergence(&a, &b);
        assert!(kl.is_finite());
        assert!(kl > 1.0);
    }

    #[test]
    fn test_grid_capped() {
        let fine = DistributionCurve::from_xy(&linspace(0.0, 1.0, 10_000), &vec![1.0; 10_000]);
        let grid = KlDivergence::new().shared_grid(&fine, &fine).unwrap();
        assert_eq!(grid.len(), MAX_GRID_POINTS);
    }

    #[test]
    fn test_density_zero_outside_support() {
        let c = DistributionCurve::from_xy(&[1.0, 2.0], &[1.0, 3.0]);
        assert_eq!(density_at(&c, 0.5), 0.0);
        assert_eq!(density_at(&c, 1.5), 2.0);
        assert_eq!(density_at(&c, 2.5), 0.0);
    }
}
