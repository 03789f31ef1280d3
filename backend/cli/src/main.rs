mod config;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use biembot_channels::{ChannelAdapter, DiscordAdapter, Presence};
use biembot_commands::build_default_dispatcher;
use biembot_config::{load_and_prepare, CONFIG_FILE_NAME};
use biembot_logging::{init_logger, level_for};

use config::Env;

#[derive(Parser, Debug)]
#[command(name = "BiemBot")]
#[command(about = "BiemBot Main")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(level_for(cli.debug));

    let env = Env::from_env();
    let bot_config = load_and_prepare(Path::new(CONFIG_FILE_NAME)).await?;

    let dispatcher = Arc::new(build_default_dispatcher(bot_config.bot_prefix.clone()));
    info!(
        commands = dispatcher.registry().len(),
        prefix = %bot_config.bot_prefix,
        "Starting BiemBot"
    );

    let token = env.require_token()?;
    let adapter = DiscordAdapter::new(token.to_string(), Presence::from_config(&bot_config));
    info!(adapter = adapter.name(), "Connecting");
    adapter.start(dispatcher).await
}
