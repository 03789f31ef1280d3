use anyhow::Result;
use async_trait::async_trait;

/// Outbound side of the chat client: deliver text to a channel.
///
/// This is the only external side effect the dispatcher produces. Adapters
/// implement it over their platform's HTTP client; tests record into memory.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send_message(&self, channel_id: u64, text: &str) -> Result<()>;
}
