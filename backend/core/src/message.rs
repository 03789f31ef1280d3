use serde::{Deserialize, Serialize};

/// The user who sent an inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: u64,
    pub name: String,
    /// Set for messages written by bot accounts (including ourselves).
    pub bot: bool,
}

/// A chat message received from the platform. One per event, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub content: String,
    pub author: Author,
    pub channel_id: u64,
    /// `None` for direct messages.
    pub guild_id: Option<u64>,
}

impl IncomingMessage {
    pub fn new(content: impl Into<String>, author: Author, channel_id: u64) -> Self {
        Self {
            content: content.into(),
            author,
            channel_id,
            guild_id: None,
        }
    }

    pub fn in_guild(mut self, guild_id: u64) -> Self {
        self.guild_id = Some(guild_id);
        self
    }

    pub fn is_direct(&self) -> bool {
        self.guild_id.is_none()
    }
}
