//! Numeric kernel: special functions, sampling, integration and CDF helpers.
//!
//! Everything here is pure. Degenerate input yields `None` rather than a
//! panic or a NaN that leaks into later stages.

pub mod cdf;
pub mod gamma;
pub mod integrate;
pub mod rng;

pub use cdf::{clean_cdf, interpolate, invert};
pub use gamma::{beta_ln_pdf, ln_beta, ln_gamma, sample_beta, sample_gamma};
pub use integrate::{cumulative_trapezoid, normalize_area, trapezoid};
pub use rng::Mulberry32;

/// `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Clamp to `[0, 1]`, mapping NaN to 0.
pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints_exact() {
        let xs = linspace(0.1, 0.7, 7);
        assert_eq!(xs.len(), 7);
        assert_eq!(xs[0], 0.1);
        assert_eq!(xs[6], 0.7);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
    }

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-2.0), 0.0);
        assert_eq!(clamp01(0.4), 0.4);
        assert_eq!(clamp01(3.0), 1.0);
        assert_eq!(clamp01(f64::NAN), 0.0);
    }
}
