//! Configuration loading for the gate host.

mod file;

use std::path::Path;

use anyhow::Context;

pub use file::{FileConfig, LinksConfig, StatConfig, StorageConfig, TimingsConfig};

/// Load configuration from `path`, or defaults when the file is absent.
pub fn load(path: &Path) -> anyhow::Result<FileConfig> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "config file absent, using defaults");
        return Ok(FileConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: FileConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    tracing::info!(path = %path.display(), "configuration loaded");
    Ok(config)
}
