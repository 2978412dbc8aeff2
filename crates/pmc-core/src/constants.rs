//! Fixed numeric tables shared across the engine.

/// Number of context dimensions.
pub const DIMENSIONS: usize = 7;

/// Linear aggregation weights in canonical dimension order. Sum to 1.0.
pub const LINEAR_WEIGHTS: [f64; DIMENSIONS] = [0.20, 0.20, 0.18, 0.15, 0.10, 0.09, 0.08];

/// Signed weights: negative entries widen the reshaped distribution,
/// positive entries narrow it. Same magnitudes as `LINEAR_WEIGHTS`.
pub const SIGNED_WEIGHTS: [f64; DIMENSIONS] = [0.20, 0.20, 0.18, 0.15, -0.10, 0.09, 0.08];

/// Per-dimension factor applied inside the probabilistic-OR aggregate.
pub const POR_FACTOR: f64 = 0.9;

/// Context correlation structure, canonical order
/// (budget, schedule, scope certainty, scope reduction, rework, risk, confidence).
///
/// Strictly diagonally dominant with unit diagonal, hence positive definite.
pub const CORRELATION: [[f64; DIMENSIONS]; DIMENSIONS] = [
    [1.00, 0.40, 0.10, 0.15, -0.10, 0.05, 0.10],
    [0.40, 1.00, 0.10, 0.15, -0.10, 0.05, 0.10],
    [0.10, 0.10, 1.00, 0.20, -0.25, -0.10, 0.15],
    [0.15, 0.15, 0.20, 1.00, -0.15, 0.05, 0.10],
    [-0.10, -0.10, -0.25, -0.15, 1.00, -0.15, -0.15],
    [0.05, 0.05, -0.10, 0.05, -0.15, 1.00, -0.20],
    [0.10, 0.10, 0.15, 0.10, -0.15, -0.20, 1.00],
];

/// Fallback "typical-good" context in unit coordinates, promoted when the
/// search finds nothing better than the baseline.
pub const TYPICAL_GOOD_UNIT: [f64; DIMENSIONS] = [0.65, 0.65, 0.60, 0.30, 0.10, 0.50, 0.60];

/// Largest mean shift as a fraction of the baseline mean (m0 = 1).
pub const MAX_MEAN_SHIFT: f64 = 0.2;

/// Largest variance shrink as a fraction of the baseline variance (m1 = 1).
pub const MAX_VARIANCE_SHRINK: f64 = 0.5;

/// Bound on the signed blend used by the CDF-lift fallback.
pub const LIFT_BLEND_CAP: f64 = 0.25;

/// Gain scale applied to the clamped blend in the CDF-lift fallback.
pub const LIFT_GAIN_SCALE: f64 = 0.25;

/// Density floor used when taking logs of PDFs.
pub const DENSITY_FLOOR: f64 = 1e-12;

/// Canonical PERT weight on the most likely value.
pub const PERT_LAMBDA: f64 = 4.0;

/// Epsilon keeping canonical Beta shape parameters strictly above 1.
pub const SHAPE_EPSILON: f64 = 1e-6;

/// Relative deviation beyond which a dimension is pulled back toward the seed.
pub const ANCHOR_THRESHOLD: f64 = 0.08;

/// Fraction of the way back to the seed an anchored dimension moves.
pub const ANCHOR_PULL: f64 = 0.8;

/// Relative deviation beyond which a dimension is re-seeded outright.
pub const HARD_REVERT_THRESHOLD: f64 = 0.5;

/// Half-width of the randomized re-seed window (relative to the seed).
pub const HARD_REVERT_JITTER: f64 = 0.1;

/// Minimum denominator for relative deviation from a seed value.
pub const DEVIATION_FLOOR: f64 = 0.05;
