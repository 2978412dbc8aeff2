//! Component seams. Each trait has one production implementation in the
//! estimator crate; tests substitute fakes through the same interface.

pub mod baseline_provider;
pub mod divergence_measure;
pub mod moment_mapper;
pub mod refitter;

pub use baseline_provider::{BaselineProvider, BaselineRequest};
pub use divergence_measure::DivergenceMeasure;
pub use moment_mapper::MomentMapper;
pub use refitter::{Refitter, Reshaped};
