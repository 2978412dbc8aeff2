//! Structured span field definitions for PMC metrics.
//!
//! Standard field names used in tracing events across the engine so log
//! queries can join stages of one run.

/// Baseline: build time in milliseconds.
pub const BASELINE_BUILD_TIME: &str = "baseline_build_time";

/// Baseline: probability at target.
pub const BASELINE_PROBABILITY: &str = "baseline_probability";

/// Search: objective evaluations performed by a stage.
pub const SEARCH_EVALUATIONS: &str = "search_evaluations";

/// Search: best score found by a stage.
pub const SEARCH_BEST_SCORE: &str = "search_best_score";

/// Search: candidates rejected by the divergence ceiling.
pub const DIVERGENCE_REJECTIONS: &str = "divergence_rejections";

/// Local refiner: iterations run.
pub const LOCAL_ITERATIONS: &str = "local_iterations";

/// Assembly: final probability at target.
pub const FINAL_PROBABILITY: &str = "final_probability";

/// Assembly: KL divergence of the final distribution.
pub const FINAL_DIVERGENCE: &str = "final_divergence";

/// Estimator: end-to-end run time in milliseconds.
pub const ESTIMATE_TIME: &str = "estimate_time";
