//! Config defaults written on first run.

/// Default command prefix.
pub const DEFAULT_BOT_PREFIX: &str = "biem!";

/// Default presence activity kind.
pub const DEFAULT_STARTING_ACTIVITY: &str = "watching";

/// Default presence text.
pub const DEFAULT_STARTING_STATUS: &str = "Anime!";
