//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Chessmate relay configuration
# Only override what you want to change -- missing fields use defaults.

[server]
# host = "0.0.0.0"
# port = 8080
# path = "/game"
# handshake_timeout_secs = 10   # 1-300
# outbound_queue = 64           # 1-4096

[matchmaking]
# waiting_ttl_secs = 0          # 0 = wait for an opponent forever
# reap_interval_secs = 30       # 1-3600

[logging]
# level = "info"                # trace, debug, info, warn, error
"##
    .to_string()
}
