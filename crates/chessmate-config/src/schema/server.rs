//! Listener and WebSocket endpoint settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where and how the relay accepts game connections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// WebSocket endpoint path; upgrades to any other path are refused.
    pub path: String,
    /// Seconds a client gets to complete the WebSocket handshake (valid range: 1-300).
    pub handshake_timeout_secs: u32,
    /// Pending outbound messages per connection (valid range: 1-4096).
    pub outbound_queue: u32,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.handshake_timeout_secs))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            path: "/game".into(),
            handshake_timeout_secs: 10,
            outbound_queue: 64,
        }
    }
}
