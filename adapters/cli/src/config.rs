use std::{fs, path::Path};

use anyhow::{Context, Result};
use dungeon_path_world::WorldConfig;

/// Loads the world configuration, falling back to defaults without a file.
pub(crate) fn load(path: Option<&Path>) -> Result<WorldConfig> {
    let Some(path) = path else {
        return Ok(WorldConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn parse(text: &str) -> Result<WorldConfig> {
    let config: WorldConfig = toml::from_str(text).context("failed to parse TOML")?;
    config
        .tuning
        .validate()
        .context("generation tuning rejected")?;
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}
