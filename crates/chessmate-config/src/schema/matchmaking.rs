//! Matchmaking queue settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Matchmaking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchmakingConfig {
    /// Seconds a connection may wait for an opponent before it is dropped.
    /// `0` disables the limit.
    pub waiting_ttl_secs: u32,
    /// How often the waiting queue is swept (valid range: 1-3600).
    pub reap_interval_secs: u32,
}

impl MatchmakingConfig {
    /// `None` when waiting connections are kept until they disconnect.
    pub fn waiting_ttl(&self) -> Option<Duration> {
        (self.waiting_ttl_secs > 0).then(|| Duration::from_secs(u64::from(self.waiting_ttl_secs)))
    }

    pub fn reap_interval(&self) -> Duration {
        Duration::from_secs(u64::from(self.reap_interval_secs))
    }
}

impl Default for MatchmakingConfig {
    fn default() -> Self {
        Self {
            waiting_ttl_secs: 0,
            reap_interval_secs: 30,
        }
    }
}
