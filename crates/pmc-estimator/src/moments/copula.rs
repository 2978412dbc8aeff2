//! Aggregation and correlation helpers over normalized context strengths.

use pmc_core::constants::{CORRELATION, DIMENSIONS, LINEAR_WEIGHTS, POR_FACTOR};
use pmc_core::types::{ContextVector, Dimension};

use crate::numeric::clamp01;

/// Per-dimension confidence strength in `[0, 1]`.
///
/// `raw / 100` for every dimension except rework, which is inverted on its
/// half-width domain (`1 − raw / 50`) because more rework means less
/// confidence.
pub fn strengths(context: &ContextVector) -> [f64; DIMENSIONS] {
    let mut out = [0.0; DIMENSIONS];
    for dim in Dimension::ALL {
        let raw = context.get(dim);
        out[dim.index()] = match dim {
            Dimension::ReworkPercentage => clamp01(1.0 - raw / dim.max_raw()),
            _ => clamp01(raw / 100.0),
        };
    }
    out
}

/// `Σ wᵢ·sᵢ`.
pub fn linear_aggregate(s: &[f64; DIMENSIONS]) -> f64 {
    s.iter().zip(LINEAR_WEIGHTS.iter()).map(|(v, w)| v * w).sum()
}

/// `1 − Π(1 − 0.9·sᵢ)`.
pub fn probabilistic_or(s: &[f64; DIMENSIONS]) -> f64 {
    1.0 - s.iter().map(|v| 1.0 - POR_FACTOR * v).product::<f64>()
}

/// Z-scores using the population standard deviation. A constant vector has
/// no spread and maps to all zeros.
pub fn z_scores(s: &[f64; DIMENSIONS]) -> [f64; DIMENSIONS] {
    let n = DIMENSIONS as f64;
    let mean = s.iter().sum::<f64>() / n;
    let sd = (s.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    if sd < 1e-12 {
        return [0.0; DIMENSIONS];
    }
    s.map(|v| (v - mean) / sd)
}

/// `C · z`.
pub fn correlate(z: &[f64; DIMENSIONS]) -> [f64; DIMENSIONS] {
    let mut out = [0.0; DIMENSIONS];
    for (row, value) in CORRELATION.iter().zip(out.iter_mut()) {
        *value = row.iter().zip(z).map(|(c, v)| c * v).sum();
    }
    out
}

/// Mean of `0.5 + 0.2·tanh(yᵢ)` over the correlated z-scores. Lies in
/// `(0.3, 0.7)`.
pub fn coupling(s: &[f64; DIMENSIONS]) -> f64 {
    let y = correlate(&z_scores(s));
    y.iter().map(|v| 0.5 + 0.2 * v.tanh()).sum::<f64>() / DIMENSIONS as f64
}

/// Cholesky factorization succeeds only for a positive definite matrix.
pub fn is_positive_definite(m: &[[f64; DIMENSIONS]; DIMENSIONS]) -> bool {
    let mut l = [[0.0; DIMENSIONS]; DIMENSIONS];
    for i in 0..DIMENSIONS {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[i][k] * l[j][k]).sum();
            if i == j {
                let d = m[i][i] - sum;
                if d <= 0.0 {
                    return false;
                }
                l[i][j] = d.sqrt();
            } else {
                l[i][j] = (m[i][j] - sum) / l[j][j];
            }
        }
    }
    true
}
