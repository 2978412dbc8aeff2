//! Empirical baseline from triangular(O, M, P) Monte Carlo samples.

use pmc_core::types::{CurvePoint, DistributionCurve, ThreePointEstimate};

use crate::numeric::{clean_cdf, normalize_area, Mulberry32};

/// Minimum histogram bin count.
pub const MIN_BINS: usize = 20;
/// Target bin width in estimate units.
pub const BIN_WIDTH: f64 = 5.0;
/// Upper bound on histogram bins.
pub const MAX_BINS: usize = 200;

/// Inverse-CDF draw from triangular(O, M, P) for a uniform `u`.
pub fn triangular_quantile(estimate: &ThreePointEstimate, u: f64) -> f64 {
    let (o, m, p) = (estimate.optimistic, estimate.most_likely, estimate.pessimistic);
    let range = estimate.range();
    let split = (m - o) / range;
    if u < split {
        o + (u * range * (m - o)).sqrt()
    } else {
        p - ((1.0 - u) * range * (p - m)).sqrt()
    }
}

/// Sorted triangular samples.
pub fn sample_sorted(estimate: &ThreePointEstimate, count: usize, rng: &mut Mulberry32) -> Vec<f64> {
    let mut samples: Vec<f64> = (0..count)
        .map(|_| triangular_quantile(estimate, rng.next_f64()))
        .collect();
    samples.sort_by(|a, b| a.total_cmp(b));
    samples
}

/// Bin count for a range: about `BIN_WIDTH` units per bin, within bounds.
pub fn bin_count(range: f64) -> usize {
    let wanted = (range / BIN_WIDTH).ceil();
    if wanted.is_finite() && wanted > 0.0 {
        (wanted as usize).clamp(MIN_BINS, MAX_BINS)
    } else {
        MIN_BINS
    }
}

/// Histogram density at bin centres, normalized to unit area.
pub fn histogram_pdf(estimate: &ThreePointEstimate, sorted: &[f64]) -> Option<DistributionCurve> {
    let bins = bin_count(estimate.range());
    let width = estimate.range() / bins as f64;
    let mut counts = vec![0usize; bins];
    for &x in sorted {
        let idx = ((x - estimate.optimistic) / width).floor();
        let idx = if idx.is_finite() && idx > 0.0 { idx as usize } else { 0 };
        counts[idx.min(bins - 1)] += 1;
    }

    let n = sorted.len().max(1) as f64;
    let xs: Vec<f64> = (0..bins)
        .map(|i| estimate.optimistic + (i as f64 + 0.5) * width)
        .collect();
    let mut ys: Vec<f64> = counts.iter().map(|&c| c as f64 / (n * width)).collect();
    if !normalize_area(&xs, &mut ys) {
        return None;
    }
    Some(DistributionCurve::from_xy(&xs, &ys))
}

/// Sorted samples as an empirical CDF, anchored at `(O, 0)`.
pub fn empirical_cdf(estimate: &ThreePointEstimate, sorted: &[f64]) -> DistributionCurve {
    let n = sorted.len() as f64;
    let mut points = Vec::with_capacity(sorted.len() + 1);
    if sorted.first().is_some_and(|&x| x > estimate.optimistic) {
        points.push(CurvePoint {
            x: estimate.optimistic,
            y: 0.0,
        });
    }
    points.extend(sorted.iter().enumerate().map(|(i, &x)| CurvePoint {
        x,
        y: (i + 1) as f64 / n,
    }));
    clean_cdf(points)
}

/// k-th percentile (fraction in `[0, 1]`) of a sorted slice.
pub fn percentile(sorted: &[f64], fraction: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let idx = (fraction.clamp(0.0, 1.0) * (sorted.len() - 1) as f64).round() as usize;
    sorted.get(idx.min(sorted.len() - 1)).copied()
}

/// Two-sided percentile interval holding `level` of the samples.
pub fn confidence_interval(sorted: &[f64], level: f64) -> Option<(f64, f64)> {
    let tail = (1.0 - level) / 2.0;
    Some((percentile(sorted, tail)?, percentile(sorted, 1.0 - tail)?))
}

/// Fraction of samples at or below `target`.
pub fn empirical_probability(sorted: &[f64], target: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let at_or_below = sorted.partition_point(|&x| x <= target);
    Some(at_or_below as f64 / sorted.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate() -> ThreePointEstimate {
        ThreePointEstimate::new(100.0, 150.0, 300.0).unwrap()
    }

    #[test]
    fn test_quantile_endpoints() {
        let e = estimate();
        assert!((triangular_quantile(&e, 0.0) - 100.0).abs() < 1e-12);
        assert!((triangular_quantile(&e, 1.0) - 300.0).abs() < 1e-12);
        // F(M) = (M − O) / R = 0.25
        assert!((triangular_quantile(&e, 0.25) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_bin_count_bounds() {
        assert_eq!(bin_count(10.0), MIN_BINS);
        assert_eq!(bin_count(200.0), 40);
        assert_eq!(bin_count(1e6), MAX_BINS);
    }

    #[test]
    fn test_sample_mean_matches_triangular() {
        let e = estimate();
        let mut rng = Mulberry32::new(5);
        let samples = sample_sorted(&e, 20_000, &mut rng);
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        // (O + M + P) / 3
        assert!((mean - 550.0 / 3.0).abs() < 1.5, "mean {mean}");
    }

    #[test]
    fn test_empirical_cdf_shape() {
        let e = estimate();
        let mut rng = Mulberry32::new(8);
        let samples = sample_sorted(&e, 1000, &mut rng);
        let cdf = empirical_cdf(&e, &samples);
        assert_eq!(cdf.first().unwrap().x, 100.0);
        assert_eq!(cdf.first().unwrap().y, 0.0);
        assert_eq!(cdf.last().unwrap().y, 1.0);
    }

    #[test]
    fn test_interval_and_probability() {
        let sorted: Vec<f64> = (0..=100).map(|i| i as f64).collect();
        let (lo, hi) = confidence_interval(&sorted, 0.9).unwrap();
        assert_eq!(lo, 5.0);
        assert_eq!(hi, 95.0);
        assert_eq!(empirical_probability(&sorted, 49.5), Some(50.0 / 101.0));
        assert!(percentile(&[], 0.5).is_none());
    }
}
