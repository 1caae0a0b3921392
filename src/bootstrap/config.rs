//! Configuration loading.
//!
//! Reads and parses the TOML file; mapping and defaults live in
//! `AppConfig::from_toml`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use ck_core::AppConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    Ok(AppConfig::from_toml(&toml_value))
}

/// Pick the configuration to run with.
///
/// An explicitly requested file must exist. The default file is optional:
/// when it is absent, or no default location could be resolved, built-in
/// defaults apply.
pub fn resolve_config(
    explicit: Option<&Path>,
    default_path: Option<PathBuf>,
) -> anyhow::Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    match default_path {
        Some(path) if path.exists() => load_config(&path),
        _ => Ok(AppConfig::default()),
    }
}
