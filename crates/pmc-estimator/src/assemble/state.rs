//! The optimization state machine.
//!
//! `Searching → Candidate → Feasible → Reshaped → RegressionCheck →
//! {Accepted | Reverted}`. A candidate that skipped the feasibility gate
//! (manual contexts, an infeasible floor) goes straight to `Reshaped`.

use pmc_core::types::Stage;
use tracing::warn;

/// True when `to` may follow `from`.
pub fn can_transition(from: Stage, to: Stage) -> bool {
    matches!(
        (from, to),
        (Stage::Searching, Stage::Candidate)
            | (Stage::Candidate, Stage::Feasible)
            | (Stage::Candidate, Stage::Reshaped)
            | (Stage::Feasible, Stage::Reshaped)
            | (Stage::Reshaped, Stage::RegressionCheck)
            | (Stage::RegressionCheck, Stage::Accepted)
            | (Stage::RegressionCheck, Stage::Reverted)
    )
}

/// Ordered record of the stages a run passed through.
#[derive(Debug, Clone, PartialEq)]
pub struct StageTrail {
    stages: Vec<Stage>,
}

impl StageTrail {
    pub fn start(initial: Stage) -> Self {
        Self {
            stages: vec![initial],
        }
    }

    pub fn current(&self) -> Stage {
        self.stages.last().copied().unwrap_or(Stage::Searching)
    }

    /// Move to `next`. An illegal transition is logged and ignored.
    pub fn advance(&mut self, next: Stage) -> bool {
        let from = self.current();
        if can_transition(from, next) {
            self.stages.push(next);
            true
        } else {
            warn!(?from, ?next, "ignoring illegal stage transition");
            false
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.current(), Stage::Accepted | Stage::Reverted)
    }

    pub fn into_stages(self) -> Vec<Stage> {
        self.stages
    }
}
