//! Chessmate relay configuration.
//!
//! TOML-based configuration with validation. All sections use defaults so
//! a partial file (or no file at all) yields a working server.
//!
//! ```rust,no_run
//! use chessmate_config::load_config;
//!
//! let config = load_config(None, |config| config.server.port = 9000)
//!     .expect("failed to load config");
//! println!("listening on {}:{}", config.server.host, config.server.port);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{LogLevel, LoggingConfig, MatchmakingConfig, RelayConfig, ServerConfig};
pub use toml_loader::{create_default_config, default_config_path, load_default, load_from_path};

use std::path::Path;

use chessmate_common::ConfigError;

/// Load the relay config from `path` (or the platform default), apply
/// command-line `overrides`, then validate the result.
pub fn load_config(
    path: Option<&Path>,
    overrides: impl FnOnce(&mut RelayConfig),
) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    overrides(&mut config);
    validation::validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("relay.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn overrides_apply_before_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[server]\noutbound_queue = 0\n");

        let config = load_config(Some(&path), |config| config.server.outbound_queue = 16).unwrap();
        assert_eq!(config.server.outbound_queue, 16);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[server]\nport = 9000\n");

        let err = load_config(Some(&path), |config| config.server.path = "game".into()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.toml")), |_| {}).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
