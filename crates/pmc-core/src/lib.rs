//! # pmc-core
//!
//! Foundation crate for the PMC estimation engine.
//! Defines the data model, component traits, errors, config, events,
//! tracing setup, and constants. The estimator crate depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::PmcConfig;
pub use errors::{ConfigError, EstimationError, InputError, PmcErrorCode};
pub use types::{
    Baseline, ContextVector, Dimension, DistributionCurve, MomentAdjustment,
    OptimizationResult, RefitParameters, SearchCandidate, Status, ThreePointEstimate,
};
