//! Event payload types.

use crate::types::{BaselineMode, Status};

/// Payload for `on_baseline_built`.
#[derive(Debug, Clone)]
pub struct BaselineBuiltEvent {
    pub mode: BaselineMode,
    pub points: usize,
    pub mean: f64,
    pub probability_at_target: f64,
}

/// Search stage that reported a completion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    WarmStart,
    Global,
    Local,
    Adaptive,
}

impl SearchStage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::WarmStart => "warm_start",
            Self::Global => "global",
            Self::Local => "local",
            Self::Adaptive => "adaptive",
        }
    }
}

/// Payload for `on_search_stage_complete`.
#[derive(Debug, Clone)]
pub struct SearchStageEvent {
    pub stage: SearchStage,
    pub evaluations: usize,
    pub best_score: f64,
    pub best_probability: f64,
    pub divergence_rejections: usize,
}

/// Payload for `on_floor_promoted`.
#[derive(Debug, Clone)]
pub struct FloorPromotedEvent {
    pub baseline_score: f64,
    pub floor_score: f64,
}

/// Payload for `on_regression_reverted`.
#[derive(Debug, Clone)]
pub struct RegressionRevertedEvent {
    pub attempted_probability: f64,
    pub baseline_probability: f64,
    pub manual: bool,
}

/// Payload for `on_estimation_complete`.
#[derive(Debug, Clone)]
pub struct EstimationCompleteEvent {
    pub status: Status,
    pub baseline_probability: f64,
    pub final_probability: f64,
    pub divergence: f64,
    pub duration_ms: u64,
}

/// Payload for `on_error`.
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    pub message: String,
    pub error_code: String,
}
