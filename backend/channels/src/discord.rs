use crate::ChannelAdapter;
use anyhow::Context as _;
use async_trait::async_trait;
use biembot_commands::{DispatchOutcome, Dispatcher};
use biembot_config::{ActivityKind, BotConfig};
use biembot_core::{Author, BotError, IncomingMessage, MessageSink};
use serenity::gateway::ActivityData;
use serenity::http::Http;
use serenity::model::channel::Message as DiscordMessage;
use serenity::model::gateway::Ready;
use serenity::model::id::ChannelId;
use serenity::model::user::OnlineStatus;
use serenity::prelude::*;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Streaming presences need a URL; the config has none, so this one is used.
const STREAM_URL: &str = "https://twitch.tv/discord";

/// Startup presence shown next to the bot's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presence {
    pub kind: ActivityKind,
    pub text: String,
}

impl Presence {
    pub fn from_config(config: &BotConfig) -> Self {
        Self { kind: config.activity_kind(), text: config.starting_status.clone() }
    }

    fn activity(&self) -> Option<ActivityData> {
        if self.text.trim().is_empty() {
            return None;
        }
        let text = self.text.clone();
        Some(match self.kind {
            ActivityKind::Playing => ActivityData::playing(text),
            ActivityKind::Listening => ActivityData::listening(text),
            ActivityKind::Watching => ActivityData::watching(text),
            ActivityKind::Competing => ActivityData::competing(text),
            ActivityKind::Streaming => match ActivityData::streaming(text.clone(), STREAM_URL) {
                Ok(activity) => activity,
                Err(e) => {
                    warn!("Invalid streaming presence, showing as playing: {:?}", e);
                    ActivityData::playing(text)
                }
            },
        })
    }
}

/// Outbound side: post text into a channel over the REST client.
pub struct DiscordSink {
    http: Arc<Http>,
}

impl DiscordSink {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl MessageSink for DiscordSink {
    async fn send_message(&self, channel_id: u64, text: &str) -> anyhow::Result<()> {
        ChannelId::new(channel_id)
            .say(&self.http, text)
            .await
            .map_err(|e| BotError::Send { channel_id, message: e.to_string() })?;
        Ok(())
    }
}

/// Converts a gateway message into the platform-neutral form.
pub fn to_incoming(msg: &DiscordMessage) -> IncomingMessage {
    incoming_from_parts(
        Author { id: msg.author.id.get(), name: msg.author.name.clone(), bot: msg.author.bot },
        msg.content.clone(),
        msg.channel_id.get(),
        msg.guild_id.map(|g| g.get()),
    )
}

fn incoming_from_parts(author: Author, content: String, channel_id: u64, guild_id: Option<u64>) -> IncomingMessage {
    let incoming = IncomingMessage::new(content, author, channel_id);
    match guild_id {
        Some(guild_id) => incoming.in_guild(guild_id),
        None => incoming,
    }
}

/// Dispatch one inbound message. Messages written by bots (ourselves
/// included) never reach the dispatcher.
pub async fn handle_incoming(
    dispatcher: &Dispatcher,
    incoming: &IncomingMessage,
    bot_id: Option<u64>,
    sink: Arc<dyn MessageSink>,
) -> DispatchOutcome {
    if incoming.author.bot {
        return DispatchOutcome::Ignored;
    }
    dispatcher.dispatch(incoming, bot_id, sink).await
}

struct Handler {
    dispatcher: Arc<Dispatcher>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: DiscordMessage) {
        let incoming = to_incoming(&msg);
        let bot_id = ctx.cache.current_user().id.get();
        let sink: Arc<dyn MessageSink> = Arc::new(DiscordSink::new(ctx.http.clone()));

        match handle_incoming(&self.dispatcher, &incoming, Some(bot_id), sink).await {
            DispatchOutcome::Ignored => {}
            DispatchOutcome::Failed { command, error } => {
                error!(channel_id = incoming.channel_id, %command, %error, "Discord command failed");
            }
            outcome => debug!(channel_id = incoming.channel_id, ?outcome, "Dispatched Discord message"),
        }
    }

    async fn ready(&self, _: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
    }
}

pub struct DiscordAdapter {
    token: String,
    presence: Presence,
}

impl DiscordAdapter {
    pub fn new(token: String, presence: Presence) -> Self {
        Self { token, presence }
    }
}

#[async_trait]
impl ChannelAdapter for DiscordAdapter {
    fn name(&self) -> &str { "discord" }

    async fn start(&self, dispatcher: Arc<Dispatcher>) -> anyhow::Result<()> {
        info!(presence = %self.presence.kind, text = %self.presence.text, "Starting Discord adapter");

        let intents = GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let mut builder = Client::builder(&self.token, intents)
            .event_handler(Handler { dispatcher })
            .status(OnlineStatus::Online);
        if let Some(activity) = self.presence.activity() {
            builder = builder.activity(activity);
        }
        let mut client = builder.await.context("Failed to build Discord client")?;

        if let Err(why) = client.start().await {
            error!("Client error: {:?}", why);
            anyhow::bail!("Discord client error: {:?}", why);
        }

        Ok(())
    }
}
