//! Config validation: field checks with user-friendly messages.

use crate::schema::{ActivityKind, BotConfig};
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &BotConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_prefix(config, &mut report);
    validate_presence(config, &mut report);
    report
}

/// The prefix must be non-empty and a single token, or no message could match it sensibly.
fn validate_prefix(config: &BotConfig, report: &mut ValidationReport) {
    if config.bot_prefix.is_empty() {
        report.error("botPrefix", "Prefix cannot be empty");
    } else if config.bot_prefix.chars().any(char::is_whitespace) {
        report.error("botPrefix", "Prefix cannot contain whitespace");
    }
}

fn validate_presence(config: &BotConfig, report: &mut ValidationReport) {
    if let Err(e) = config.starting_activity.parse::<ActivityKind>() {
        report.warn("startingActivity", format!("{e}; using watching"));
    }
    if config.starting_status.trim().is_empty() {
        report.warn("startingStatus", "Presence text is empty; no activity will be shown");
    }
}
