//! Top-level PMC configuration with 4-layer resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{BaselineConfig, GuardConfig, KlGateMode, SearchConfig, StorageConfig};
use crate::errors::ConfigError;
use crate::types::BaselineMode;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`PMC_*`)
/// 3. Project config (`pmc.toml` in project root)
/// 4. User config (`~/.pmc/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PmcConfig {
    pub baseline: BaselineConfig,
    pub search: SearchConfig,
    pub guard: GuardConfig,
    pub storage: StorageConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub baseline_mode: Option<BaselineMode>,
    pub search_seed: Option<u64>,
    pub search_parallel: Option<bool>,
    pub kl_ceiling: Option<f64>,
}

impl PmcConfig {
    /// Load configuration with 4-layer resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(ConfigError::ParseError { .. }) => {
                        return Err(ConfigError::ParseError {
                            path: user_config_path.display().to_string(),
                            message: "invalid TOML in user config".to_string(),
                        });
                    }
                    Err(e) => {
                        // Unreadable user config is not fatal; continue with defaults.
                        ::tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join("pmc.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: PmcConfig = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &PmcConfig) -> Result<(), ConfigError> {
        if let Some(points) = config.baseline.grid_points {
            if points < 16 {
                return Err(invalid("baseline.grid_points", "must be at least 16"));
            }
        }
        if let Some(w) = config.baseline.smoothing_weight {
            if !(0.0..=1.0).contains(&w) {
                return Err(invalid("baseline.smoothing_weight", "must be between 0.0 and 1.0"));
            }
        }
        if let Some(n) = config.search.unseeded_samples {
            if n == 0 {
                return Err(invalid("search.unseeded_samples", "must be greater than 0"));
            }
        }
        if let Some(step) = config.search.initial_step {
            if !(step > 0.0 && step <= 1.0) {
                return Err(invalid("search.initial_step", "must be in (0.0, 1.0]"));
            }
        }
        if let Some(tol) = config.search.step_tolerance {
            if !(tol > 0.0) {
                return Err(invalid("search.step_tolerance", "must be greater than 0"));
            }
        }
        if let Some(ceiling) = config.guard.kl_ceiling {
            if !(ceiling > 0.0 && ceiling.is_finite()) {
                return Err(invalid("guard.kl_ceiling", "must be a positive finite number"));
            }
        }
        if let Some(tol) = config.guard.regression_tolerance {
            if !(0.0..=0.1).contains(&tol) {
                return Err(invalid("guard.regression_tolerance", "must be between 0.0 and 0.1"));
            }
        }
        if let Some(points) = config.storage.max_points {
            if points < 2 {
                return Err(invalid("storage.max_points", "must be at least 2"));
            }
        }
        if let Some(decimals) = config.storage.decimals {
            if decimals > 15 {
                return Err(invalid("storage.decimals", "must be at most 15"));
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.pmc/config.toml`.
    fn user_config_path() -> Option<std::path::PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut PmcConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: PmcConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` has a `Some` value.
    fn merge(base: &mut PmcConfig, other: &PmcConfig) {
        // Baseline
        if other.baseline.grid_points.is_some() {
            base.baseline.grid_points = other.baseline.grid_points;
        }
        if other.baseline.mode.is_some() {
            base.baseline.mode = other.baseline.mode;
        }
        if other.baseline.smoothing_weight.is_some() {
            base.baseline.smoothing_weight = other.baseline.smoothing_weight;
        }
        if other.baseline.seed.is_some() {
            base.baseline.seed = other.baseline.seed;
        }

        // Search
        if other.search.unseeded_samples.is_some() {
            base.search.unseeded_samples = other.search.unseeded_samples;
        }
        if other.search.warm_start_samples.is_some() {
            base.search.warm_start_samples = other.search.warm_start_samples;
        }
        if other.search.local_iterations.is_some() {
            base.search.local_iterations = other.search.local_iterations;
        }
        if other.search.seeded_local_iterations.is_some() {
            base.search.seeded_local_iterations = other.search.seeded_local_iterations;
        }
        if other.search.initial_step.is_some() {
            base.search.initial_step = other.search.initial_step;
        }
        if other.search.step_tolerance.is_some() {
            base.search.step_tolerance = other.search.step_tolerance;
        }
        if other.search.seed.is_some() {
            base.search.seed = other.search.seed;
        }
        if other.search.parallel.is_some() {
            base.search.parallel = other.search.parallel;
        }

        // Guard
        if other.guard.kl_ceiling.is_some() {
            base.guard.kl_ceiling = other.guard.kl_ceiling;
        }
        if other.guard.kl_gate.is_some() {
            base.guard.kl_gate = other.guard.kl_gate;
        }
        if other.guard.regression_tolerance.is_some() {
            base.guard.regression_tolerance = other.guard.regression_tolerance;
        }
        if other.guard.improvement_epsilon.is_some() {
            base.guard.improvement_epsilon = other.guard.improvement_epsilon;
        }

        // Storage
        if other.storage.max_points.is_some() {
            base.storage.max_points = other.storage.max_points;
        }
        if other.storage.decimals.is_some() {
            base.storage.decimals = other.storage.decimals;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `PMC_BASELINE_MODE`, `PMC_SEARCH_SEED`, etc.
    fn apply_env_overrides(config: &mut PmcConfig) {
        if let Ok(val) = std::env::var("PMC_BASELINE_MODE") {
            if let Ok(v) = val.parse::<BaselineMode>() {
                config.baseline.mode = Some(v);
            }
        }
        if let Ok(val) = std::env::var("PMC_BASELINE_GRID_POINTS") {
            if let Ok(v) = val.parse::<usize>() {
                config.baseline.grid_points = Some(v);
            }
        }
        if let Ok(val) = std::env::var("PMC_SEARCH_SEED") {
            if let Ok(v) = val.parse::<u64>() {
                config.search.seed = Some(v);
            }
        }
        if let Ok(val) = std::env::var("PMC_SEARCH_PARALLEL") {
            if let Ok(v) = val.parse::<bool>() {
                config.search.parallel = Some(v);
            }
        }
        if let Ok(val) = std::env::var("PMC_GUARD_KL_CEILING") {
            if let Ok(v) = val.parse::<f64>() {
                config.guard.kl_ceiling = Some(v);
            }
        }
        if let Ok(val) = std::env::var("PMC_GUARD_KL_GATE") {
            match val.as_str() {
                "strict" => config.guard.kl_gate = Some(KlGateMode::Strict),
                "diagnostic" => config.guard.kl_gate = Some(KlGateMode::Diagnostic),
                _ => {}
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut PmcConfig, cli: &CliOverrides) {
        if let Some(v) = cli.baseline_mode {
            config.baseline.mode = Some(v);
        }
        if let Some(v) = cli.search_seed {
            config.search.seed = Some(v);
        }
        if let Some(v) = cli.search_parallel {
            config.search.parallel = Some(v);
        }
        if let Some(v) = cli.kl_ceiling {
            config.guard.kl_ceiling = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Returns the user-level config directory: `~/.pmc/`.
fn dirs_path() -> Option<std::path::PathBuf> {
    home_dir().map(|h| h.join(".pmc"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}
