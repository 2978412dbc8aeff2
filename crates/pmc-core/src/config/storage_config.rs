//! Storage record formatting configuration.

use serde::{Deserialize, Serialize};

/// Limits applied when a result is flattened for persistence.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Maximum PDF/CDF points kept. Default: 100.
    pub max_points: Option<usize>,
    /// Decimal places kept on numeric fields. Default: 6.
    pub decimals: Option<u32>,
}

impl StorageConfig {
    pub fn effective_max_points(&self) -> usize {
        self.max_points.unwrap_or(100)
    }

    pub fn effective_decimals(&self) -> u32 {
        self.decimals.unwrap_or(6)
    }
}
