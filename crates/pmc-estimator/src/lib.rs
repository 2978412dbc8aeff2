//! # pmc-estimator
//!
//! Distribution reshaping and context optimization for three-point
//! estimates. Builds a baseline distribution, maps a context vector to
//! moment adjustments, refits under a divergence guard, and searches the
//! context space for the setting that most raises the probability of
//! hitting a target without regressing it.

pub mod assemble;
pub mod baseline;
pub mod divergence;
pub mod estimator;
pub mod moments;
pub mod numeric;
pub mod report;
pub mod reshape;
pub mod search;

pub use baseline::PertBaselineProvider;
pub use divergence::KlDivergence;
pub use estimator::{estimate, EstimationInput, Estimator};
pub use moments::CopulaMomentMapper;
pub use report::{contributions, Contribution, StorageRecord};
pub use reshape::BetaRefitter;
