//! Per-section validators.

use crate::schema::RelayConfig;

use super::helpers::validate_range;

/// Validate listener settings.
pub(crate) fn validate_server(errors: &mut Vec<String>, config: &RelayConfig) {
    let server = &config.server;

    if server.host.trim().is_empty() {
        errors.push("server.host must not be empty".into());
    }
    if !server.path.starts_with('/') {
        errors.push(format!("server.path = {:?} must start with '/'", server.path));
    }
    validate_range(
        errors,
        "server.handshake_timeout_secs",
        server.handshake_timeout_secs,
        1,
        300,
    );
    validate_range(errors, "server.outbound_queue", server.outbound_queue, 1, 4096);
}

/// Validate matchmaking constraints.
pub(crate) fn validate_matchmaking(errors: &mut Vec<String>, config: &RelayConfig) {
    validate_range(
        errors,
        "matchmaking.reap_interval_secs",
        config.matchmaking.reap_interval_secs,
        1,
        3600,
    );
}
