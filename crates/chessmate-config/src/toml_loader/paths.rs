//! Where the relay looks for `relay.toml`, and first-run creation of it.

use chessmate_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::info;

use super::template::default_config_toml;

/// `<config_dir>/chessmate/relay.toml`, e.g. `~/.config/chessmate/relay.toml`
/// on Linux.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("no platform config directory to hold relay.toml".into()))?;
    Ok(config_dir.join("chessmate").join("relay.toml"))
}

/// Write the commented relay template to `path`, creating parent
/// directories as needed.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "cannot create {} for the relay config: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, default_config_toml()).map_err(|e| {
        ConfigError::ParseError(format!(
            "cannot write relay template to {}: {e}",
            path.display()
        ))
    })?;

    info!(path = %path.display(), "Wrote default relay config");
    Ok(())
}
