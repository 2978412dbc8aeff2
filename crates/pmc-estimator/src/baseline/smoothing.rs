//! Gaussian kernel smoothing of Monte Carlo Beta draws.

use pmc_core::types::{RefitParameters, ThreePointEstimate};

use crate::numeric::{normalize_area, sample_beta, Mulberry32};

const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Silverman's rule-of-thumb bandwidth `1.06·σ·n^(-1/5)`.
pub fn silverman_bandwidth(samples: &[f64]) -> Option<f64> {
    let n = samples.len();
    if n < 2 {
        return None;
    }
    let mean = samples.iter().sum::<f64>() / n as f64;
    let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let h = 1.06 * var.sqrt() * (n as f64).powf(-0.2);
    (h > 0.0 && h.is_finite()).then_some(h)
}

/// Draw `count` values from Beta(α, β) mapped onto `[O, P]`.
pub fn draw_beta_samples(
    estimate: &ThreePointEstimate,
    shape: &RefitParameters,
    count: usize,
    rng: &mut Mulberry32,
) -> Vec<f64> {
    (0..count)
        .filter_map(|_| sample_beta(shape.alpha, shape.beta, rng))
        .map(|u| estimate.from_unit(u))
        .collect()
}

/// Gaussian KDE evaluated on `xs`, truncated to the grid and renormalized.
/// `None` when the samples are degenerate.
pub fn kde_on_grid(samples: &[f64], xs: &[f64]) -> Option<Vec<f64>> {
    let h = silverman_bandwidth(samples)?;
    let n = samples.len() as f64;
    let mut ys: Vec<f64> = xs
        .iter()
        .map(|&x| {
            let sum: f64 = samples
                .iter()
                .map(|&s| {
                    let z = (x - s) / h;
                    (-0.5 * z * z).exp()
                })
                .sum();
            sum * INV_SQRT_2PI / (n * h)
        })
        .collect();
    normalize_area(xs, &mut ys).then_some(ys)
}

/// `(1 − w)·pdf + w·kde`, renormalized to unit area.
pub fn mix(xs: &[f64], pdf: &[f64], kde: &[f64], weight: f64) -> Option<Vec<f64>> {
    let w = weight.clamp(0.0, 1.0);
    let mut ys: Vec<f64> = pdf
        .iter()
        .zip(kde)
        .map(|(&p, &k)| (1.0 - w) * p + w * k)
        .collect();
    normalize_area(xs, &mut ys).then_some(ys)
}
