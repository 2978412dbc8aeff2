//! Baseline builder: three-point estimate to PDF/CDF plus derived scalars.

pub mod builder;
pub mod pert;
pub mod smoothing;
pub mod triangular;

pub use builder::PertBaselineProvider;
pub use pert::{beta_curves, canonical_shape};
