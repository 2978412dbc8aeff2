//! Data model shared by every stage of an estimation run.

pub mod baseline;
pub mod candidate;
pub mod context;
pub mod curve;
pub mod estimate;
pub mod moments;
pub mod result;

pub use baseline::{Baseline, BaselineMode};
pub use candidate::{best_of, SearchCandidate};
pub use context::{ContextVector, Dimension};
pub use curve::{CurvePoint, DistributionCurve};
pub use estimate::ThreePointEstimate;
pub use moments::{MomentAdjustment, RefitParameters};
pub use result::{
    OptimizationResult, Recovery, ReshapeMethod, SearchDiagnostics, Stage, Status,
};
