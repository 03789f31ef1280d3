//! Structured logging components for BiemBot.
//!
//! Handles subscriber setup, log redaction, and command event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{CommandEvent, EventLogEntry, EventLogger};
pub use logger::{init_logger, level_for};
pub use redact::redact_sensitive_data;
