//! `biembot-config`: persisted bot settings.
//!
//! Provides:
//! - Typed config schema (command prefix, startup presence)
//! - JSON load-or-initialize bootstrap with atomic first write
//! - Default values
//! - Validation with field paths

pub mod defaults;
pub mod io;
pub mod schema;
pub mod validation;

pub use schema::{ActivityKind, BotConfig};
pub use io::{config_file_path, load_or_init, write_config, CONFIG_FILE_NAME};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::Result;
use std::path::Path;

/// Load (or create) the config file and validate it.
///
/// Warnings are logged; errors are logged and turned into `Err`.
pub async fn load_and_prepare(path: &Path) -> Result<BotConfig> {
    let config = load_or_init(path).await?;

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.into_iter().next() {
        return Err(first.into());
    }

    Ok(config)
}
