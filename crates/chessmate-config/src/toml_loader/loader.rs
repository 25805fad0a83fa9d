//! Reading `relay.toml` into a [`RelayConfig`].

use crate::schema::RelayConfig;
use crate::validation;
use chessmate_common::ConfigError;
use std::path::Path;
use tracing::{info, warn};

use super::paths::{create_default_config, default_config_path};

/// Read and parse the relay config at `path`.
///
/// Missing fields take their serde defaults. Validation failures are
/// logged as a warning and the parsed config is returned as-is; callers
/// that need a valid config run `validation::validate` themselves.
pub fn load_from_path(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConfigError::FileNotFound(path.to_path_buf()),
        _ => ConfigError::ParseError(format!("cannot read relay config {}: {e}", path.display())),
    })?;

    let config: RelayConfig = toml::from_str(&content).map_err(|e| {
        ConfigError::ParseError(format!("relay config {} is not valid TOML: {e}", path.display()))
    })?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), error = %e, "Relay config has invalid values");
    }

    info!(path = %path.display(), "Loaded relay config");
    Ok(config)
}

/// Read the relay config from [`default_config_path`]. On first run the
/// commented template is written there and the built-in defaults are used.
pub fn load_default() -> Result<RelayConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::FileNotFound(_)) => {
            info!(path = %path.display(), "No relay config yet");
            create_default_config(&path)?;
            Ok(RelayConfig::default())
        }
        Err(e) => Err(e),
    }
}
