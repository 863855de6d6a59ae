mod schema;

pub use schema::{Config, SnapshotSource};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/paddock/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("paddock"))
}

/// Get the default config file path (~/.config/paddock/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path
///   (~/.config/paddock/config.yaml)
///
/// Relative snapshot paths are resolved against the config file's directory.
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Create ~/.config/paddock/config.yaml or pass --snapshot",
            config_path.display()
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let mut config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    if let Some(base) = config_path.parent() {
        resolve_snapshot_paths(&mut config, base);
    }

    Ok(config)
}

fn resolve_snapshot_paths(config: &mut Config, base: &Path) {
    for source in &mut config.snapshots {
        if source.path.is_relative() {
            source.path = base.join(&source.path);
        }
    }
}
