//! Effective configuration

use std::path::Path;

use anyhow::{Context, Result};

use qbridge_core::{BridgeConfig, ConfigValidation};

/// Resolve the layered configuration: defaults, then `path` if it exists, then overrides from
/// `lookup`. The result is validated before it is returned.
pub fn resolve_config<F>(path: &Path, lookup: F) -> Result<BridgeConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = if path.exists() {
        BridgeConfig::load_from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        BridgeConfig::defaults()
    };
    config.merge_with(lookup)?;
    config.validate()?;
    Ok(config)
}

/// Print the effective configuration as TOML
pub fn handle_config(path: &Path) -> Result<String> {
    let config = resolve_config(path, |key| std::env::var(key).ok())?;
    Ok(config.to_toml()?)
}
