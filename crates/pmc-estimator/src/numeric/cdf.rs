//! CDF hygiene, interpolation and inversion.

use pmc_core::types::{CurvePoint, DistributionCurve};

/// Clean a raw CDF so it satisfies the curve invariants.
///
/// Drops non-finite points, sorts by `x`, merges duplicate `x` keeping the
/// larger `y`, clamps to `[0, 1]`, forces `y` non-decreasing and snaps the
/// last point to exactly 1.
pub fn clean_cdf(points: Vec<CurvePoint>) -> DistributionCurve {
    let mut points: Vec<CurvePoint> = points
        .into_iter()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect();
    points.sort_by(|a, b| a.x.total_cmp(&b.x));

    let mut out: Vec<CurvePoint> = Vec::with_capacity(points.len());
    for p in points {
        let y = p.y.clamp(0.0, 1.0);
        match out.last_mut() {
            Some(last) if last.x == p.x => last.y = last.y.max(y),
            _ => out.push(CurvePoint { x: p.x, y }),
        }
    }

    let mut running = 0.0_f64;
    for p in out.iter_mut() {
        running = running.max(p.y);
        p.y = running;
    }
    if let Some(last) = out.last_mut() {
        last.y = 1.0;
    }
    DistributionCurve::new(out)
}

/// `F(x)` by linear interpolation.
///
/// Clamps to 0 below the first point and to 1 above the last. `None` for an
/// empty curve or a non-finite query.
pub fn interpolate(cdf: &DistributionCurve, x: f64) -> Option<f64> {
    let points = cdf.points();
    let (first, last) = (points.first()?, points.last()?);
    if !x.is_finite() {
        return None;
    }
    if x <= first.x {
        return Some(if x < first.x { 0.0 } else { first.y });
    }
    if x >= last.x {
        return Some(1.0);
    }

    // First index with point.x > x; x lies in (points[hi-1].x, points[hi].x].
    let hi = points.partition_point(|p| p.x <= x);
    let (a, b) = (points[hi - 1], points[hi]);
    let dx = b.x - a.x;
    if dx <= 0.0 {
        return Some(b.y);
    }
    Some(a.y + (b.y - a.y) * (x - a.x) / dx)
}

/// `F⁻¹(p)`: smallest `x` with `F(x) >= p`, linearly interpolated.
/// `None` for an empty curve or `p` outside `[0, 1]`.
pub fn invert(cdf: &DistributionCurve, p: f64) -> Option<f64> {
    let points = cdf.points();
    let first = points.first()?;
    if !(0.0..=1.0).contains(&p) {
        return None;
    }
    if p <= first.y {
        return Some(first.x);
    }

    let hi = points.partition_point(|q| q.y < p);
    if hi >= points.len() {
        return points.last().map(|q| q.x);
    }
    let (a, b) = (points[hi - 1], points[hi]);
    let dy = b.y - a.y;
    if dy <= 0.0 {
        return Some(b.x);
    }
    Some(a.x + (b.x - a.x) * (p - a.y) / dy)
}
