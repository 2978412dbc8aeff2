//! Configuration system for the PMC engine.
//! TOML-based, 4-layer resolution: CLI > env > project > user > defaults.

pub mod baseline_config;
pub mod guard_config;
pub mod pmc_config;
pub mod search_config;
pub mod storage_config;

pub use baseline_config::BaselineConfig;
pub use guard_config::{GuardConfig, KlGateMode};
pub use pmc_config::{CliOverrides, PmcConfig};
pub use search_config::SearchConfig;
pub use storage_config::StorageConfig;
