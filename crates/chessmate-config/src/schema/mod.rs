//! Configuration schema types.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod logging;
mod matchmaking;
mod server;

pub use logging::*;
pub use matchmaking::*;
pub use server::*;

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub server: ServerConfig,
    pub matchmaking: MatchmakingConfig,
    pub logging: LoggingConfig,
}
