use std::sync::Arc;

use async_trait::async_trait;
use biembot_commands::Dispatcher;

pub mod discord;

pub use discord::{DiscordAdapter, DiscordSink, Presence};

/// All chat platform adapters implement this trait.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable adapter name for logging.
    fn name(&self) -> &str;

    /// Connect and feed every inbound message to `dispatcher` until the
    /// connection ends.
    async fn start(&self, dispatcher: Arc<Dispatcher>) -> anyhow::Result<()>;
}
