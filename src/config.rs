//! Machine configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Time a dispense takes from start to completion.
pub const DEFAULT_DISPENSE_DELAY_MS: u64 = 3_000;

/// Phase transitions kept in a machine's history before the oldest are dropped.
pub const DEFAULT_HISTORY_LIMIT: usize = 1_000;

/// Tunables for a single machine. Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MachineConfig {
    pub dispense_delay_ms: u64,
    pub history_limit: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            dispense_delay_ms: DEFAULT_DISPENSE_DELAY_MS,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl MachineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn dispense_delay(&self) -> Duration {
        Duration::from_millis(self.dispense_delay_ms)
    }
}
