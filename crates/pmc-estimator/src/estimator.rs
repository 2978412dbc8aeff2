//! Estimator facade: validation, baseline, search and assembly in order.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pmc_core::config::{CliOverrides, KlGateMode, PmcConfig};
use pmc_core::errors::{EstimationError, InputError, PmcErrorCode};
use pmc_core::events::{
    BaselineBuiltEvent, EstimationCompleteEvent, EstimationEventHandler, ErrorEvent,
    EventDispatcher,
};
use pmc_core::tracing::metrics;
use pmc_core::traits::{
    BaselineProvider, BaselineRequest, DivergenceMeasure, MomentMapper, Refitter,
};
use pmc_core::types::{
    Baseline, ContextVector, OptimizationResult, Recovery, SearchCandidate, SearchDiagnostics,
    Stage, ThreePointEstimate,
};
use serde::{Deserialize, Serialize};
use tracing::{field::Empty, info, info_span, warn};

use crate::assemble::{Assembler, Selection, StageTrail};
use crate::baseline::PertBaselineProvider;
use crate::divergence::KlDivergence;
use crate::moments::CopulaMomentMapper;
use crate::reshape::BetaRefitter;
use crate::search::lhs::directional_bias;
use crate::search::{AdaptiveController, GlobalSearch, LocalRefiner, Objective, SearchBounds};

/// Deepest probe level.
pub const MAX_PROBE_LEVEL: u8 = 7;

fn default_confidence_level() -> f64 {
    0.9
}

fn default_sample_count() -> usize {
    1000
}

fn default_optimize() -> bool {
    true
}

fn default_probe_level() -> u8 {
    3
}

/// One estimation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationInput {
    pub estimate: ThreePointEstimate,
    /// Value whose probability is maximized. Defaults to the PERT mean.
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
    /// Monte Carlo draws for the sampling baseline modes.
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,
    #[serde(default = "default_optimize")]
    pub optimize: bool,
    /// Run the conservative seeded pass after the first search.
    #[serde(default)]
    pub adaptive: bool,
    /// Depth of the seeded pass, 1..=7. Level 1 re-evaluates the seed only.
    #[serde(default = "default_probe_level")]
    pub probe_level: u8,
    /// Apply this context instead of searching.
    #[serde(default)]
    pub manual_context: Option<ContextVector>,
}

impl EstimationInput {
    pub fn new(estimate: ThreePointEstimate) -> Self {
        Self {
            estimate,
            target: None,
            confidence_level: default_confidence_level(),
            sample_count: default_sample_count(),
            optimize: default_optimize(),
            adaptive: false,
            probe_level: default_probe_level(),
            manual_context: None,
        }
    }

    pub fn with_target(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    pub fn with_sample_count(mut self, count: usize) -> Self {
        self.sample_count = count;
        self
    }

    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn with_adaptive(mut self, adaptive: bool, probe_level: u8) -> Self {
        self.adaptive = adaptive;
        self.probe_level = probe_level;
        self
    }

    pub fn with_manual_context(mut self, context: ContextVector) -> Self {
        self.manual_context = Some(context);
        self
    }

    /// Checks the fields the baseline provider does not.
    pub fn validate(&self) -> Result<(), InputError> {
        self.estimate.validate()?;
        if let Some(target) = self.target {
            if !target.is_finite() {
                return Err(InputError::NonFinite { field: "target" });
            }
        }
        if !(1..=MAX_PROBE_LEVEL).contains(&self.probe_level) {
            return Err(InputError::InvalidProbeLevel {
                value: self.probe_level,
            });
        }
        if let Some(context) = &self.manual_context {
            context.validate()?;
        }
        Ok(())
    }
}

/// Runs estimations with a fixed configuration and component set.
pub struct Estimator {
    config: PmcConfig,
    baseline_provider: Arc<dyn BaselineProvider>,
    mapper: Arc<dyn MomentMapper>,
    refitter: Arc<dyn Refitter>,
    divergence: Arc<dyn DivergenceMeasure>,
    events: EventDispatcher,
}

impl Estimator {
    /// Production components configured from `config`.
    pub fn new(config: PmcConfig) -> Self {
        let provider = PertBaselineProvider::from_config(&config.baseline);
        Self::with_components(
            config,
            Arc::new(provider),
            Arc::new(CopulaMomentMapper::new()),
            Arc::new(BetaRefitter::new()),
            Arc::new(KlDivergence::new()),
        )
    }

    /// Load configuration from `root` (see [`PmcConfig::load`]).
    pub fn from_root(root: &Path, cli: Option<&CliOverrides>) -> Result<Self, EstimationError> {
        Ok(Self::new(PmcConfig::load(root, cli)?))
    }

    pub fn with_components(
        config: PmcConfig,
        baseline_provider: Arc<dyn BaselineProvider>,
        mapper: Arc<dyn MomentMapper>,
        refitter: Arc<dyn Refitter>,
        divergence: Arc<dyn DivergenceMeasure>,
    ) -> Self {
        Self {
            config,
            baseline_provider,
            mapper,
            refitter,
            divergence,
            events: EventDispatcher::new(),
        }
    }

    pub fn register_handler(&mut self, handler: Arc<dyn EstimationEventHandler>) {
        self.events.register(handler);
    }

    pub fn config(&self) -> &PmcConfig {
        &self.config
    }

    /// Run one estimation. Only invalid input fails.
    pub fn estimate(&self, input: &EstimationInput) -> Result<OptimizationResult, EstimationError> {
        let started = Instant::now();
        let span = info_span!(
            "estimate",
            baseline_build_time = Empty,
            baseline_probability = Empty,
            final_probability = Empty,
            final_divergence = Empty,
            estimate_time = Empty,
        );
        let _entered = span.enter();

        match self.run(input, &span) {
            Ok(result) => {
                let duration_ms = started.elapsed().as_millis() as u64;
                span.record(metrics::FINAL_PROBABILITY, result.final_probability);
                span.record(metrics::FINAL_DIVERGENCE, result.divergence);
                span.record(metrics::ESTIMATE_TIME, duration_ms);
                info!(
                    status = result.status.name(),
                    baseline_probability = result.baseline_probability,
                    final_probability = result.final_probability,
                    divergence = result.divergence,
                    "estimation complete"
                );
                self.events.emit_estimation_complete(&EstimationCompleteEvent {
                    status: result.status,
                    baseline_probability: result.baseline_probability,
                    final_probability: result.final_probability,
                    divergence: result.divergence,
                    duration_ms,
                });
                Ok(result)
            }
            Err(err) => {
                warn!(error = %err, code = err.error_code(), "estimation rejected");
                self.events.emit_error(&ErrorEvent {
                    message: err.to_string(),
                    error_code: err.error_code().to_string(),
                });
                Err(err)
            }
        }
    }

    /// Run tasks in order, checking `budget` between tasks. Failed and
    /// skipped tasks yield `status = error` results in their slot.
    pub fn estimate_many(
        &self,
        inputs: &[EstimationInput],
        budget: Option<Duration>,
    ) -> Vec<OptimizationResult> {
        let started = Instant::now();
        inputs
            .iter()
            .enumerate()
            .map(|(task_index, input)| {
                if let Some(budget) = budget {
                    if started.elapsed() >= budget {
                        let err = EstimationError::BudgetExhausted {
                            budget_ms: budget.as_millis() as u64,
                            task_index,
                        };
                        warn!(task_index, "time budget exhausted; skipping task");
                        return OptimizationResult::failed(err.api_string());
                    }
                }
                match self.estimate(input) {
                    Ok(result) => result,
                    Err(err) => OptimizationResult::failed(err.api_string()),
                }
            })
            .collect()
    }

    fn run(
        &self,
        input: &EstimationInput,
        span: &tracing::Span,
    ) -> Result<OptimizationResult, EstimationError> {
        input.validate()?;
        let target = input.target.unwrap_or_else(|| input.estimate.pert_mean());

        let build_started = Instant::now();
        let baseline = self.baseline_provider.build(&BaselineRequest {
            estimate: input.estimate,
            target,
            confidence_level: input.confidence_level,
            sample_count: input.sample_count,
        })?;
        span.record(metrics::BASELINE_BUILD_TIME, build_started.elapsed().as_millis() as u64);
        span.record(metrics::BASELINE_PROBABILITY, baseline.probability_at_target);
        self.events.emit_baseline_built(&BaselineBuiltEvent {
            mode: baseline.mode,
            points: baseline.pdf.len(),
            mean: baseline.mean,
            probability_at_target: baseline.probability_at_target,
        });

        let assembler = Assembler {
            baseline: &baseline,
            mapper: self.mapper.as_ref(),
            refitter: self.refitter.as_ref(),
            divergence: self.divergence.as_ref(),
            guard: &self.config.guard,
            confidence_level: input.confidence_level,
        };

        let selection = match (&input.manual_context, input.optimize) {
            (Some(context), _) => Selection::manual(*context),
            (None, false) => Selection::none(),
            (None, true) => self.search(&baseline, input),
        };
        Ok(assembler.assemble(selection, &self.events))
    }

    fn search(&self, baseline: &Baseline, input: &EstimationInput) -> Selection {
        let search_config = &self.config.search;
        let kl_ceiling = self.config.guard.effective_kl_ceiling();
        let kl_gate = self.config.guard.effective_kl_gate();
        let objective = Objective {
            baseline,
            mapper: self.mapper.as_ref(),
            refitter: self.refitter.as_ref(),
            divergence: self.divergence.as_ref(),
            bounds: SearchBounds::standard(),
            bias: directional_bias(baseline.coefficient_of_variation, baseline.probability_at_target),
            kl_ceiling,
            kl_gate,
            seed: search_config.effective_seed(),
            leash: None,
        };

        let mut trail = StageTrail::start(Stage::Searching);
        let global = GlobalSearch::new(&objective, search_config).run(None, &self.events);
        let mut diagnostics = SearchDiagnostics {
            evaluations: global.evaluations,
            warm_start_score: global.warm_start_best.as_ref().map(|c| c.score),
            global_best_score: global.best.as_ref().map(|c| c.score),
            local_iterations: 0,
            floor_promoted: global.floor_promoted,
            adaptive: input.adaptive,
            divergence_rejections: global.divergence_rejections,
        };

        let Some(start) = global.best else {
            return Selection {
                search: Some(diagnostics),
                ..Selection::none()
            };
        };

        let local = LocalRefiner::unseeded(search_config).refine(
            &objective,
            start,
            global.evaluations,
            &self.events,
        );
        diagnostics.evaluations += local.evaluations;
        diagnostics.local_iterations += local.iterations;
        diagnostics.divergence_rejections += local.divergence_rejections;
        let mut chosen: SearchCandidate = local.best;

        if input.adaptive {
            let adaptive = AdaptiveController::new(search_config).run(
                &objective,
                &chosen,
                input.probe_level,
                &self.events,
            );
            diagnostics.evaluations += adaptive.evaluations;
            diagnostics.local_iterations += adaptive.local_iterations;
            diagnostics.divergence_rejections += adaptive.divergence_rejections;
            if adaptive.best.feasible {
                chosen = adaptive.best;
            }
        }

        let mut recoveries = Vec::new();
        if global.floor_promoted {
            recoveries.push(Recovery::SearchInfeasible);
        }
        if kl_gate == KlGateMode::Strict && diagnostics.divergence_rejections > 0 {
            recoveries.push(Recovery::DivergenceExceeded {
                rejected: diagnostics.divergence_rejections,
                ceiling: kl_ceiling,
            });
        }

        trail.advance(Stage::Candidate);
        Selection {
            context: chosen.vector,
            manual: false,
            feasible: chosen.feasible,
            floor_promoted: global.floor_promoted,
            search: Some(diagnostics),
            recoveries,
            trail,
        }
    }
}

impl Default for Estimator {
    fn default() -> Self {
        Self::new(PmcConfig::default())
    }
}

impl std::fmt::Debug for Estimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Estimator")
            .field("config", &self.config)
            .field("handlers", &self.events.handler_count())
            .finish_non_exhaustive()
    }
}

/// Estimate with the default configuration and production components.
pub fn estimate(input: &EstimationInput) -> Result<OptimizationResult, EstimationError> {
    Estimator::default().estimate(input)
}
