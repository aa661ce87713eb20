//! Configuration file loading.

use std::path::{Path, PathBuf};

use anyhow::Context;
use crumbs_types::Config;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "crumbs.toml";

/// Path to the configuration file: `explicit` if given, else
/// [`DEFAULT_CONFIG_PATH`].
pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load and parse the configuration at `path`.
pub fn load(path: &Path) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = parse(&content).with_context(|| format!("parsing config {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        baker = %config.baking_address,
        overrides = config.delegator_overrides.len(),
        "loaded config"
    );
    Ok(config)
}

/// Parse a TOML configuration.
pub fn parse(content: &str) -> anyhow::Result<Config> {
    Ok(toml::from_str(content)?)
}
