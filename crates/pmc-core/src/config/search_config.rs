//! Search configuration (global sampling and local refinement).

use serde::{Deserialize, Serialize};

/// Configuration for the global search, local refiner and adaptive pass.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchConfig {
    /// Latin-hypercube population for an unseeded run. Default: 250.
    pub unseeded_samples: Option<usize>,
    /// Warm-start subset size. Default: 50.
    pub warm_start_samples: Option<usize>,
    /// Local refiner iteration budget, unseeded. Default: 60.
    pub local_iterations: Option<usize>,
    /// Local refiner iteration budget, seeded. Default: 100.
    pub seeded_local_iterations: Option<usize>,
    /// Initial local step `rho`. Default: 0.1.
    pub initial_step: Option<f64>,
    /// Local refiner stops once `rho` falls below this. Default: 1e-3.
    pub step_tolerance: Option<f64>,
    /// Seed for Latin-hypercube sampling and per-candidate sub-seeds.
    pub seed: Option<u64>,
    /// Evaluate candidate batches on the rayon pool. Default: true.
    pub parallel: Option<bool>,
}

impl SearchConfig {
    pub fn effective_unseeded_samples(&self) -> usize {
        self.unseeded_samples.unwrap_or(250)
    }

    pub fn effective_warm_start_samples(&self) -> usize {
        self.warm_start_samples.unwrap_or(50)
    }

    pub fn effective_local_iterations(&self) -> usize {
        self.local_iterations.unwrap_or(60)
    }

    pub fn effective_seeded_local_iterations(&self) -> usize {
        self.seeded_local_iterations.unwrap_or(100)
    }

    pub fn effective_initial_step(&self) -> f64 {
        self.initial_step.unwrap_or(0.1)
    }

    pub fn effective_step_tolerance(&self) -> f64 {
        self.step_tolerance.unwrap_or(1e-3)
    }

    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or(0x0DD5_EED5)
    }

    pub fn effective_parallel(&self) -> bool {
        self.parallel.unwrap_or(true)
    }
}
