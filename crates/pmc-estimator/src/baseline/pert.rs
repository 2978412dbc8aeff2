//! Canonical PERT Beta shapes and Beta grids mapped onto `[O, P]`.

use pmc_core::constants::{PERT_LAMBDA, SHAPE_EPSILON};
use pmc_core::types::{CurvePoint, DistributionCurve, RefitParameters, ThreePointEstimate};

use crate::numeric::{beta_ln_pdf, clean_cdf, cumulative_trapezoid, linspace, ln_beta, normalize_area};

/// Smallest unit coordinate the grid evaluates when both shapes are >= 1.
const UNIT_EDGE: f64 = 1e-9;

/// `α = 1 + λ(M−O)/R`, `β = 1 + λ(P−M)/R`, each kept strictly above 1.
pub fn canonical_shape(estimate: &ThreePointEstimate) -> Option<RefitParameters> {
    let range = estimate.range();
    let floor = 1.0 + SHAPE_EPSILON;
    let alpha = (1.0 + PERT_LAMBDA * (estimate.most_likely - estimate.optimistic) / range).max(floor);
    let beta = (1.0 + PERT_LAMBDA * (estimate.pessimistic - estimate.most_likely) / range).max(floor);
    RefitParameters::new(alpha, beta)
}

/// Beta(α, β) PDF and CDF on `points` evenly spaced values over `[O, P]`.
///
/// The PDF is normalized to unit trapezoid area and the CDF is its running
/// integral after hygiene. When a shape is below 1 the density is unbounded
/// at that edge, so edge points are evaluated half a grid step inside.
/// `None` when the shapes cannot produce a finite, positive density.
pub fn beta_curves(
    estimate: &ThreePointEstimate,
    shape: &RefitParameters,
    points: usize,
) -> Option<(DistributionCurve, DistributionCurve)> {
    if points < 2 {
        return None;
    }
    let ln_norm = ln_beta(shape.alpha, shape.beta)?;
    let edge = if shape.alpha < 1.0 || shape.beta < 1.0 {
        0.5 / (points - 1) as f64
    } else {
        UNIT_EDGE
    };

    let xs = linspace(estimate.optimistic, estimate.pessimistic, points);
    let mut ys: Vec<f64> = xs
        .iter()
        .map(|&x| {
            let u = estimate.to_unit(x).clamp(edge, 1.0 - edge);
            beta_ln_pdf(u, shape.alpha, shape.beta, ln_norm)
                .map(f64::exp)
                .unwrap_or(0.0)
        })
        .collect();
    if !normalize_area(&xs, &mut ys) {
        return None;
    }

    let cdf = cdf_from_pdf(&xs, &ys)?;
    Some((DistributionCurve::from_xy(&xs, &ys), cdf))
}

/// Running integral of a unit-area PDF, scaled to end at 1 and cleaned.
pub fn cdf_from_pdf(xs: &[f64], pdf: &[f64]) -> Option<DistributionCurve> {
    let cum = cumulative_trapezoid(xs, pdf);
    let total = *cum.last()?;
    if !(total > 0.0 && total.is_finite()) {
        return None;
    }
    let points = xs
        .iter()
        .zip(&cum)
        .map(|(&x, &c)| CurvePoint { x, y: c / total })
        .collect();
    Some(clean_cdf(points))
}
