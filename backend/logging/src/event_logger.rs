//! Command Event Logger
//!
//! Structured dispatch events (invoked, rejected, failed) emitted on the
//! `command_events` tracing target.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum CommandEvent {
    Invoked {
        command: String,
        implementation: String,
        args: Vec<String>,
    },
    /// Resolution stopped before a handler ran (unknown command, bad arity...).
    Rejected {
        content: String,
        reason: String,
    },
    Failed {
        command: String,
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub channel_id: u64,
    pub author_id: u64,
    pub timestamp: DateTime<Utc>,
    pub event: CommandEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Redacts the event's free text and hands it to the tracing system.
    pub fn log_event(channel_id: u64, author_id: u64, event: CommandEvent) -> EventLogEntry {
        let entry = EventLogEntry {
            channel_id,
            author_id,
            timestamp: Utc::now(),
            event: Self::redact(event),
        };

        info!(target: "command_events", event = ?entry, "Command event");
        entry
    }

    fn redact(event: CommandEvent) -> CommandEvent {
        match event {
            CommandEvent::Invoked { command, implementation, args } => CommandEvent::Invoked {
                command,
                implementation,
                args: args.iter().map(|a| redact_sensitive_data(a)).collect(),
            },
            CommandEvent::Rejected { content, reason } => CommandEvent::Rejected {
                content: redact_sensitive_data(&content),
                reason,
            },
            CommandEvent::Failed { command, error_msg } => CommandEvent::Failed {
                command,
                error_msg: redact_sensitive_data(&error_msg),
            },
        }
    }
}
