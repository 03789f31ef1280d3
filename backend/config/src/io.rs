//! Config file bootstrap: read the JSON file, or create it with defaults.

use crate::schema::BotConfig;
use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info};

/// Config file name, resolved against the working directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Resolve the full path to the config file inside `dir`.
pub fn config_file_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Load the config, creating it with defaults on first run.
///
/// An existing file is never rewritten. If the defaults cannot be written
/// the error is logged and the in-memory defaults are returned anyway.
pub async fn load_or_init(path: &Path) -> Result<BotConfig> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "Config file does not exist; writing defaults");
            let config = BotConfig::default();
            if let Err(e) = write_config(&config, path).await {
                error!(path = %path.display(), "Failed to write config: {:#}", e);
            }
            return Ok(config);
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to read config file: {}", path.display()));
        }
    };

    let config: BotConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse config JSON at: {}", path.display()))?;

    info!(path = %path.display(), prefix = %config.bot_prefix, "Loaded config");
    Ok(config)
}

/// Write config to disk atomically (write to temp file, rename), pretty-printed.
pub async fn write_config(config: &BotConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }

    let json = serde_json::to_string_pretty(config)
        .context("Failed to serialize config to JSON")?;

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json.as_bytes())
        .await
        .with_context(|| format!("Failed to write temp config: {}", tmp_path.display()))?;

    fs::rename(&tmp_path, path).await.with_context(|| {
        format!("Failed to rename temp config to: {}", path.display())
    })?;

    info!(path = %path.display(), "Wrote config");
    Ok(())
}
