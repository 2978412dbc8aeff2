//! Terminal assembly with the regression guard.

use pmc_core::config::{GuardConfig, KlGateMode};
use pmc_core::events::{EventDispatcher, RegressionRevertedEvent};
use pmc_core::traits::{DivergenceMeasure, MomentMapper, Refitter};
use pmc_core::types::{
    Baseline, ContextVector, MomentAdjustment, OptimizationResult, Recovery, ReshapeMethod,
    SearchDiagnostics, Stage, Status,
};
use tracing::{info, warn};

use super::state::StageTrail;
use crate::numeric::{interpolate, invert};
use crate::reshape::pass_through;
use crate::report::narrative;

/// The context handed to the assembler and how it was chosen.
#[derive(Debug, Clone)]
pub struct Selection {
    pub context: ContextVector,
    /// Caller-supplied context (manual path).
    pub manual: bool,
    /// Passed the search feasibility gate.
    pub feasible: bool,
    /// The search fell back to the floor context.
    pub floor_promoted: bool,
    pub search: Option<SearchDiagnostics>,
    /// Recoveries already recorded upstream.
    pub recoveries: Vec<Recovery>,
    /// Trail so far; assembly continues it.
    pub trail: StageTrail,
}

impl Selection {
    /// A caller-supplied context.
    pub fn manual(context: ContextVector) -> Self {
        Self {
            context,
            manual: true,
            feasible: false,
            floor_promoted: false,
            search: None,
            recoveries: Vec::new(),
            trail: StageTrail::start(Stage::Candidate),
        }
    }

    /// Nothing to apply: the baseline is returned as is.
    pub fn none() -> Self {
        Self {
            context: ContextVector::ZERO,
            manual: false,
            feasible: false,
            floor_promoted: false,
            search: None,
            recoveries: Vec::new(),
            trail: StageTrail::start(Stage::Candidate),
        }
    }
}

/// Rebuilds the final distribution from a context and applies the guards.
pub struct Assembler<'a> {
    pub baseline: &'a Baseline,
    pub mapper: &'a dyn MomentMapper,
    pub refitter: &'a dyn Refitter,
    pub divergence: &'a dyn DivergenceMeasure,
    pub guard: &'a GuardConfig,
    pub confidence_level: f64,
}

enum Verdict {
    Accept,
    /// Restore the baseline with this status, recording `recovery`.
    Restore(Status, Option<Recovery>),
}

impl<'a> Assembler<'a> {
    /// Recompute everything from `selection.context`; never reuses a
    /// probability computed upstream.
    pub fn assemble(&self, selection: Selection, events: &EventDispatcher) -> OptimizationResult {
        let Selection {
            context,
            manual,
            feasible,
            floor_promoted,
            search,
            mut recoveries,
            mut trail,
        } = selection;
        let baseline = self.baseline;
        let p0 = baseline.probability_at_target;
        let ceiling = self.guard.effective_kl_ceiling();
        let strict = self.guard.effective_kl_gate() == KlGateMode::Strict;

        if feasible {
            trail.advance(Stage::Feasible);
        }
        let adjustment = self.mapper.map(&context, baseline.coefficient_of_variation);
        let reshaped = self.refitter.reshape(baseline, &adjustment, &context);
        trail.advance(Stage::Reshaped);
        if reshaped.method == ReshapeMethod::CdfLift {
            recoveries.push(Recovery::RefitInfeasible);
        }

        let probability = interpolate(&reshaped.cdf, baseline.target).unwrap_or(p0);
        let candidate_divergence = self.divergence.divergence(&reshaped.pdf, &baseline.pdf);
        trail.advance(Stage::RegressionCheck);

        let tolerance = self.guard.effective_regression_tolerance();
        let verdict = if probability < p0 {
            let material = probability < p0 - tolerance;
            let status = match (manual, material) {
                (true, _) => Status::ManualReverted,
                (false, true) => Status::Reverted,
                (false, false) => Status::NoOptimize,
            };
            Verdict::Restore(
                status,
                Some(Recovery::RegressionGuard {
                    attempted: probability,
                    baseline: p0,
                }),
            )
        } else if !manual && strict && candidate_divergence > ceiling {
            Verdict::Restore(
                Status::NoOptimize,
                Some(Recovery::DivergenceExceeded {
                    rejected: 1,
                    ceiling,
                }),
            )
        } else {
            Verdict::Accept
        };

        let (sliders, reshaped, moments, status) = match verdict {
            Verdict::Accept => {
                trail.advance(Stage::Accepted);
                let gain = probability - p0;
                let status = if manual {
                    Status::Manual
                } else if gain > self.guard.effective_improvement_epsilon() || floor_promoted {
                    Status::Ok
                } else {
                    Status::NoOptimize
                };
                (context, reshaped, adjustment, status)
            }
            Verdict::Restore(status, recovery) => {
                trail.advance(Stage::Reverted);
                if let Some(Recovery::RegressionGuard { attempted, .. }) = &recovery {
                    warn!(
                        attempted_probability = *attempted,
                        baseline_probability = p0,
                        manual,
                        status = status.name(),
                        "result regressed; baseline restored"
                    );
                    events.emit_regression_reverted(&RegressionRevertedEvent {
                        attempted_probability: *attempted,
                        baseline_probability: p0,
                        manual,
                    });
                } else {
                    info!(
                        divergence = candidate_divergence,
                        ceiling, "final candidate over divergence ceiling; baseline restored"
                    );
                }
                recoveries.extend(recovery);
                (
                    ContextVector::ZERO,
                    pass_through(baseline),
                    MomentAdjustment::NEUTRAL,
                    status,
                )
            }
        };

        let final_probability = if reshaped.method == ReshapeMethod::PassThrough {
            p0
        } else {
            interpolate(&reshaped.cdf, baseline.target).unwrap_or(p0)
        };
        let divergence = self.divergence.divergence(&reshaped.pdf, &baseline.pdf);
        let baseline_value_at_confidence =
            invert(&baseline.cdf, self.confidence_level).unwrap_or(baseline.mean);
        let final_value_at_confidence =
            invert(&reshaped.cdf, self.confidence_level).unwrap_or(baseline_value_at_confidence);

        OptimizationResult {
            sliders,
            narrative: narrative(status, p0, final_probability, divergence),
            reshaped_pdf: reshaped.pdf,
            reshaped_cdf: reshaped.cdf,
            baseline_probability: p0,
            final_probability,
            divergence,
            divergence_exceeded: divergence > ceiling,
            status,
            reshape_method: reshaped.method,
            moments,
            refit: reshaped.refit,
            confidence_level: self.confidence_level,
            baseline_value_at_confidence,
            final_value_at_confidence,
            recoveries,
            stages: trail.into_stages(),
            search,
        }
    }
}
