//! Divergence guard.

pub mod kl;

pub use kl::KlDivergence;
