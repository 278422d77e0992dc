//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod process;

use std::path::Path;

use tracing::debug;

use invext_core::InvextConfig;

/// Load configuration from an explicit path, the user config file, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<InvextConfig> {
    if let Some(path) = config_path {
        debug!("Loading config from {}", path);
        return Ok(InvextConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(InvextConfig::from_file(&default_path)?)
    } else {
        Ok(InvextConfig::default())
    }
}
