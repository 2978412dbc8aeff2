//! Log-gamma, the Beta density, and gamma/beta variate sampling.

use std::f64::consts::PI;

use super::rng::Mulberry32;

const LANCZOS_G: f64 = 7.0;

/// Lanczos coefficients for `g = 7`: a constant term plus eight rational terms.
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// `ln |Γ(z)|`.
///
/// Uses the reflection `Γ(z)Γ(1−z) = π / sin(πz)` below 0.5. Returns `None`
/// for non-finite input and at the poles (non-positive integers).
pub fn ln_gamma(z: f64) -> Option<f64> {
    if !z.is_finite() {
        return None;
    }
    if z < 0.5 {
        let s = (PI * z).sin();
        if s == 0.0 {
            return None;
        }
        return Some(PI.ln() - s.abs().ln() - ln_gamma(1.0 - z)?);
    }

    let z = z - 1.0;
    let mut acc = LANCZOS_COEFFICIENTS[0];
    for (i, c) in LANCZOS_COEFFICIENTS.iter().enumerate().skip(1) {
        acc += c / (z + i as f64);
    }
    let t = z + LANCZOS_G + 0.5;
    let value = 0.5 * (2.0 * PI).ln() + (z + 0.5) * t.ln() - t + acc.ln();
    value.is_finite().then_some(value)
}

/// `ln B(α, β)`. `None` unless both shapes are finite and positive.
pub fn ln_beta(alpha: f64, beta: f64) -> Option<f64> {
    if !(alpha > 0.0 && beta > 0.0) {
        return None;
    }
    Some(ln_gamma(alpha)? + ln_gamma(beta)? - ln_gamma(alpha + beta)?)
}

/// Log density of Beta(α, β) at `u` in the open unit interval.
///
/// `ln_norm` is `ln B(α, β)`, passed in so grid evaluation computes it once.
/// Returns `None` outside `(0, 1)`.
pub fn beta_ln_pdf(u: f64, alpha: f64, beta: f64, ln_norm: f64) -> Option<f64> {
    if !(u > 0.0 && u < 1.0) {
        return None;
    }
    let value = (alpha - 1.0) * u.ln() + (beta - 1.0) * (1.0 - u).ln() - ln_norm;
    value.is_finite().then_some(value)
}

/// One Gamma(shape, 1) variate.
///
/// Marsaglia-Tsang rejection for `shape > 1`; for `shape <= 1` a
/// Gamma(shape + 1) draw is thinned by `U^(1/shape)`.
pub fn sample_gamma(shape: f64, rng: &mut Mulberry32) -> Option<f64> {
    if !(shape > 0.0 && shape.is_finite()) {
        return None;
    }
    if shape <= 1.0 {
        let boosted = sample_gamma(shape + 1.0, rng)?;
        let u = rng.next_f64().max(f64::MIN_POSITIVE);
        return Some(boosted * u.powf(1.0 / shape));
    }

    let d = shape - 1.0 / 3.0;
    let c = 1.0 / (9.0 * d).sqrt();
    loop {
        let z = rng.next_normal();
        let v = 1.0 + c * z;
        if v <= 0.0 {
            continue;
        }
        let v = v * v * v;
        let u = rng.next_f64();
        if u < 1.0 - 0.0331 * z.powi(4) {
            return Some(d * v);
        }
        if u > 0.0 && u.ln() < 0.5 * z * z + d * (1.0 - v + v.ln()) {
            return Some(d * v);
        }
    }
}

/// One Beta(α, β) variate on `[0, 1]` via the gamma ratio.
pub fn sample_beta(alpha: f64, beta: f64, rng: &mut Mulberry32) -> Option<f64> {
    let x = sample_gamma(alpha, rng)?;
    let y = sample_gamma(beta, rng)?;
    let sum = x + y;
    if sum > 0.0 && sum.is_finite() {
        Some(x / sum)
    } else {
        None
    }
}
