//! Bot configuration schema, stored as camelCase JSON.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::defaults::{DEFAULT_BOT_PREFIX, DEFAULT_STARTING_ACTIVITY, DEFAULT_STARTING_STATUS};

/// Root configuration. Fields missing from an existing file take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotConfig {
    /// Text that marks a message as a command (e.g. `biem!test`).
    pub bot_prefix: String,
    /// Presence activity kind shown at startup (`playing`, `watching`, ...).
    pub starting_activity: String,
    /// Presence text shown at startup.
    pub starting_status: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot_prefix: DEFAULT_BOT_PREFIX.to_string(),
            starting_activity: DEFAULT_STARTING_ACTIVITY.to_string(),
            starting_status: DEFAULT_STARTING_STATUS.to_string(),
        }
    }
}

impl BotConfig {
    /// Parsed presence kind, falling back to `Watching` for unknown values.
    pub fn activity_kind(&self) -> ActivityKind {
        self.starting_activity.parse().unwrap_or(ActivityKind::Watching)
    }
}

/// Presence activity kinds the chat platform understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Playing,
    Streaming,
    Listening,
    Watching,
    Competing,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown activity kind `{0}` (expected playing, streaming, listening, watching or competing)")]
pub struct UnknownActivityKind(pub String);

impl FromStr for ActivityKind {
    type Err = UnknownActivityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "playing" => Ok(Self::Playing),
            "streaming" => Ok(Self::Streaming),
            "listening" => Ok(Self::Listening),
            "watching" => Ok(Self::Watching),
            "competing" => Ok(Self::Competing),
            _ => Err(UnknownActivityKind(s.to_string())),
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Playing => "playing",
            Self::Streaming => "streaming",
            Self::Listening => "listening",
            Self::Watching => "watching",
            Self::Competing => "competing",
        };
        f.write_str(s)
    }
}
