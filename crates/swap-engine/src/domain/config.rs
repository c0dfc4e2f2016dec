//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the exchange engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of commit attempts per operation before contention is
    /// reported to the caller. Treated as at least one attempt.
    pub commit_retry_limit: u32,
    /// Upper bound on slot titles, in characters, after trimming.
    pub max_title_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            commit_retry_limit: 4,
            max_title_len: 200,
        }
    }
}

impl EngineConfig {
    /// Tight limits for tests so contention and size errors surface quickly.
    pub fn for_testing() -> Self {
        Self {
            commit_retry_limit: 2,
            max_title_len: 64,
        }
    }
}
