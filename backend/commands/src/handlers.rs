/// Built-in command handlers.
///
/// Each handler is a concrete struct implementing `CommandHandler` and
/// exposing a static implementation table.
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::dispatch::{CommandContext, CommandHandler};
use crate::registry::CommandRegistry;
use crate::types::{ArgumentKind, Arguments, Implementation};

// ---------------------------------------------------------------------------
// test
// ---------------------------------------------------------------------------

pub struct TestCommand;

impl TestCommand {
    const IMPLEMENTATIONS: &'static [Implementation] =
        &[Implementation::new("greet", &[ArgumentKind::String])];
}

#[async_trait]
impl CommandHandler for TestCommand {
    fn name(&self) -> &str {
        "test"
    }

    fn description(&self) -> &str {
        "Test"
    }

    fn implementations(&self) -> &[Implementation] {
        Self::IMPLEMENTATIONS
    }

    async fn invoke(&self, ctx: &CommandContext, implementation: &Implementation, args: Arguments) -> Result<()> {
        match implementation.name {
            "greet" => ctx.reply(format!("hi {}", args.require(0)?.as_text())).await,
            other => anyhow::bail!("test has no implementation `{other}`"),
        }
    }
}

// ---------------------------------------------------------------------------
// test subcommand
// ---------------------------------------------------------------------------

pub struct PingSubcommand;

impl PingSubcommand {
    const IMPLEMENTATIONS: &'static [Implementation] =
        &[Implementation::new("ping_user", &[ArgumentKind::User])];
}

#[async_trait]
impl CommandHandler for PingSubcommand {
    fn name(&self) -> &str {
        "subcommand"
    }

    fn implementations(&self) -> &[Implementation] {
        Self::IMPLEMENTATIONS
    }

    async fn invoke(&self, ctx: &CommandContext, implementation: &Implementation, args: Arguments) -> Result<()> {
        match implementation.name {
            "ping_user" => {
                let target = args.require(0)?;
                // Passthrough mode hands the raw token over; echo it as typed.
                let mention = target
                    .as_user()
                    .map(|id| format!("<@{id}>"))
                    .unwrap_or_else(|| target.raw.clone());
                info!(target_user = %mention, "Pinging user");
                ctx.reply(format!("hi there {mention}")).await
            }
            other => anyhow::bail!("subcommand has no implementation `{other}`"),
        }
    }
}

/// Registry with every built-in command.
pub fn builtin_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register("test", Arc::new(TestCommand), vec![Arc::new(PingSubcommand)]);
    registry
}
