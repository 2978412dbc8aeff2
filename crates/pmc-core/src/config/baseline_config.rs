//! Baseline construction configuration.

use serde::{Deserialize, Serialize};

use crate::types::BaselineMode;

/// Configuration for the baseline builder.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BaselineConfig {
    /// PDF/CDF grid points for the Beta modes. Default: 200.
    pub grid_points: Option<usize>,
    /// Baseline construction mode. Default: pert.
    pub mode: Option<BaselineMode>,
    /// Weight of the kernel-smoothed sample in `pert_smoothed`. Default: 0.3.
    pub smoothing_weight: Option<f64>,
    /// Seed for Monte Carlo baseline sampling.
    pub seed: Option<u64>,
}

impl BaselineConfig {
    pub fn effective_grid_points(&self) -> usize {
        self.grid_points.unwrap_or(200)
    }

    pub fn effective_mode(&self) -> BaselineMode {
        self.mode.unwrap_or_default()
    }

    pub fn effective_smoothing_weight(&self) -> f64 {
        self.smoothing_weight.unwrap_or(0.3)
    }

    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or(0x5EED_2024)
    }
}
