/// Command dispatch: resolve a message to a handler implementation and run it.
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::FutureExt;
use tracing::{debug, error, info, warn};

use biembot_core::{IncomingMessage, MessageSink};
use biembot_logging::{CommandEvent, EventLogger};

use crate::coercion::{coerce_all, CoercionError, CoercionMode};
use crate::detection::{parse_invocation, strip_prefix};
use crate::registry::{CommandDefinition, CommandRegistry};
use crate::types::{Arguments, Implementation, ParsedInvocation};

// ---------------------------------------------------------------------------
// Handler trait
// ---------------------------------------------------------------------------

/// Context passed to every command handler.
#[derive(Clone)]
pub struct CommandContext {
    pub message: IncomingMessage,
    sink: Arc<dyn MessageSink>,
}

impl CommandContext {
    pub fn new(message: IncomingMessage, sink: Arc<dyn MessageSink>) -> Self {
        Self { message, sink }
    }

    /// Send text back to the channel the message came from.
    pub async fn reply(&self, text: impl AsRef<str> + Send) -> Result<()> {
        self.sink.send_message(self.message.channel_id, text.as_ref()).await
    }
}

impl fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext").field("message", &self.message).finish_non_exhaustive()
    }
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Command or subcommand name, matched case-insensitively.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Registration table. When several entries share an arity the first
    /// declared one is selected; kinds play no part in selection.
    fn implementations(&self) -> &[Implementation];

    async fn invoke(&self, ctx: &CommandContext, implementation: &Implementation, args: Arguments) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What `Dispatcher::dispatch` did with a message.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Not addressed to the bot; nothing was sent.
    Ignored,
    MissingCommand,
    CommandNotFound { command: String },
    InvalidArguments { command: String, given: usize },
    MalformedArgument { command: String, error: CoercionError },
    Invoked { command: String, subcommand: Option<String>, implementation: &'static str },
    Failed { command: String, error: String },
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

pub struct Dispatcher {
    registry: CommandRegistry,
    prefix: String,
    coercion: CoercionMode,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry, prefix: impl Into<String>) -> Self {
        Self { registry, prefix: prefix.into(), coercion: CoercionMode::default() }
    }

    pub fn with_coercion(mut self, mode: CoercionMode) -> Self {
        self.coercion = mode;
        self
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Handle one inbound message. Every resolution failure sends exactly one
    /// reply and returns early; handler errors and panics are reported to the
    /// channel and never propagate.
    pub async fn dispatch(
        &self,
        message: &IncomingMessage,
        bot_id: Option<u64>,
        sink: Arc<dyn MessageSink>,
    ) -> DispatchOutcome {
        let Some(body) = strip_prefix(&message.content, &self.prefix, bot_id) else {
            return DispatchOutcome::Ignored;
        };
        let ctx = CommandContext::new(message.clone(), sink);

        let Some(mut inv) = parse_invocation(body) else {
            self.reject(&ctx, "missing command", self.overview()).await;
            return DispatchOutcome::MissingCommand;
        };
        debug!(command = %inv.command, parts = inv.args.len() + 1, "Handling command string");

        let Some(def) = self.registry.lookup(&inv.command) else {
            let text = format!(
                "Unknown command `{}`. Send `{}` on its own to list commands.",
                inv.command, self.prefix
            );
            self.reject(&ctx, "command not found", text).await;
            return DispatchOutcome::CommandNotFound { command: inv.command };
        };

        let handler = resolve_handler(def, &mut inv);

        let Some(implementation) = handler
            .implementations()
            .iter()
            .find(|imp| imp.arity() == inv.args.len())
        else {
            let text = self.usage(&inv, def, handler.as_ref());
            self.reject(&ctx, "invalid arguments", text).await;
            return DispatchOutcome::InvalidArguments { command: inv.command, given: inv.args.len() };
        };
        debug!(
            implementation = implementation.name,
            params = ?implementation.params,
            "Resolved implementation"
        );

        let args = match coerce_all(implementation.params, &inv.args, self.coercion) {
            Ok(args) => args,
            Err(e) => {
                let text = format!("Invalid argument #{}: {}", e.position + 1, e);
                self.reject(&ctx, "malformed argument", text).await;
                return DispatchOutcome::MalformedArgument { command: inv.command, error: e };
            }
        };

        EventLogger::log_event(
            message.channel_id,
            message.author.id,
            CommandEvent::Invoked {
                command: inv.command.clone(),
                implementation: implementation.name.to_string(),
                args: args.raw(),
            },
        );

        let result = AssertUnwindSafe(handler.invoke(&ctx, implementation, args))
            .catch_unwind()
            .await;

        let error = match result {
            Ok(Ok(())) => {
                info!(command = %inv.command, implementation = implementation.name, "Command completed");
                return DispatchOutcome::Invoked {
                    command: inv.command,
                    subcommand: inv.subcommand,
                    implementation: implementation.name,
                };
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => "handler panicked".to_string(),
        };

        error!(command = %inv.command, error = %error, "Command failed");
        EventLogger::log_event(
            message.channel_id,
            message.author.id,
            CommandEvent::Failed { command: inv.command.clone(), error_msg: error.clone() },
        );
        if let Err(e) = ctx.reply(&error).await {
            warn!("Failed to report command error: {:#}", e);
        }
        DispatchOutcome::Failed { command: inv.command, error }
    }

    /// Listing of every registered command, sent when no command is given.
    pub fn overview(&self) -> String {
        let mut lines = vec!["*Available commands:*".to_string()];
        for (name, def) in self.registry.iter() {
            let description = def.handler.description();
            if description.is_empty() {
                lines.push(format!("• `{}{}`", self.prefix, name));
            } else {
                lines.push(format!("• `{}{}`: {}", self.prefix, name, description));
            }
        }
        lines.join("\n")
    }

    /// Usage lines for the resolved handler. When the default handler was
    /// chosen, every subcommand's forms are listed as well.
    fn usage(&self, inv: &ParsedInvocation, def: &CommandDefinition, handler: &dyn CommandHandler) -> String {
        let base = format!("{}{}", self.prefix, inv.command);
        let head = match &inv.subcommand {
            Some(sub) => format!("{base} {sub}"),
            None => base.clone(),
        };
        let mut lines = vec![format!("Invalid arguments for `{head}`. Usage:")];
        push_usage(&mut lines, &head, handler);
        if inv.subcommand.is_none() {
            for sub in &def.subcommands {
                push_usage(&mut lines, &format!("{base} {}", sub.name()), sub.as_ref());
            }
        }
        lines.join("\n")
    }

    async fn reject(&self, ctx: &CommandContext, reason: &str, text: String) {
        EventLogger::log_event(
            ctx.message.channel_id,
            ctx.message.author.id,
            CommandEvent::Rejected { content: ctx.message.content.clone(), reason: reason.to_string() },
        );
        if let Err(e) = ctx.reply(&text).await {
            warn!("Failed to send {} response: {:#}", reason, e);
        }
    }
}

fn push_usage(lines: &mut Vec<String>, head: &str, handler: &dyn CommandHandler) {
    for imp in handler.implementations() {
        let usage = imp.usage();
        if usage.is_empty() {
            lines.push(format!("• `{head}`"));
        } else {
            lines.push(format!("• `{head} {usage}`"));
        }
    }
}

/// Pick the subcommand named by the first argument, consuming that token,
/// or fall back to the default handler and leave the arguments untouched.
fn resolve_handler<'a>(def: &'a CommandDefinition, inv: &mut ParsedInvocation) -> &'a Arc<dyn CommandHandler> {
    if let Some(sub) = inv.args.first().and_then(|first| def.subcommand(first)) {
        inv.subcommand = Some(inv.args.remove(0));
        return sub;
    }
    &def.handler
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ArgumentKind, ArgumentValue};
    use biembot_core::Author;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<(u64, String)>>,
    }

    impl RecordingSink {
        fn sent(&self) -> Vec<(u64, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageSink for RecordingSink {
        async fn send_message(&self, channel_id: u64, text: &str) -> Result<()> {
            self.sent.lock().unwrap().push((channel_id, text.to_string()));
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl MessageSink for FailingSink {
        async fn send_message(&self, _channel_id: u64, _text: &str) -> Result<()> {
            anyhow::bail!("gateway closed")
        }
    }

    const ECHO_IMPLS: &[Implementation] = &[
        Implementation::new("none", &[]),
        Implementation::new("text", &[ArgumentKind::String]),
        Implementation::new("number", &[ArgumentKind::Number]),
        Implementation::new("pair", &[ArgumentKind::String, ArgumentKind::Number]),
    ];

    struct Echo;

    #[async_trait]
    impl CommandHandler for Echo {
        fn name(&self) -> &str { "test" }
        fn description(&self) -> &str { "Echo things" }
        fn implementations(&self) -> &[Implementation] { ECHO_IMPLS }
        async fn invoke(&self, ctx: &CommandContext, imp: &Implementation, args: Arguments) -> Result<()> {
            ctx.reply(format!("{} {}", imp.name, args.raw().join(","))).await
        }
    }

    const MENTION_IMPLS: &[Implementation] = &[Implementation::new("user", &[ArgumentKind::User])];

    struct Mention;

    #[async_trait]
    impl CommandHandler for Mention {
        fn name(&self) -> &str { "subcommand" }
        fn implementations(&self) -> &[Implementation] { MENTION_IMPLS }
        async fn invoke(&self, ctx: &CommandContext, _imp: &Implementation, args: Arguments) -> Result<()> {
            let arg = args.require(0)?;
            match arg.value {
                ArgumentValue::User(id) => ctx.reply(format!("user {id}")).await,
                _ => ctx.reply(format!("raw {}", arg.raw)).await,
            }
        }
    }

    const ONE_ARG: &[Implementation] = &[Implementation::new("run", &[ArgumentKind::String])];

    struct Boom;

    #[async_trait]
    impl CommandHandler for Boom {
        fn name(&self) -> &str { "boom" }
        fn implementations(&self) -> &[Implementation] { ONE_ARG }
        async fn invoke(&self, _ctx: &CommandContext, _imp: &Implementation, args: Arguments) -> Result<()> {
            if args.require(0)?.raw == "panic" {
                panic!("handler blew up");
            }
            anyhow::bail!("boom failed")
        }
    }

    fn dispatcher() -> Dispatcher {
        let mut registry = CommandRegistry::new();
        registry.register("test", Arc::new(Echo), vec![Arc::new(Mention)]);
        registry.register("boom", Arc::new(Boom), vec![]);
        Dispatcher::new(registry, "biem!")
    }

    fn msg(content: &str) -> IncomingMessage {
        IncomingMessage::new(content, Author { id: 5, name: "someone".into(), bot: false }, 100)
    }

    async fn run(d: &Dispatcher, content: &str) -> (DispatchOutcome, Vec<(u64, String)>) {
        let sink = Arc::new(RecordingSink::default());
        let outcome = d.dispatch(&msg(content), Some(42), sink.clone()).await;
        (outcome, sink.sent())
    }

    #[tokio::test]
    async fn test_unprefixed_message_is_ignored() {
        let d = dispatcher();
        for content in ["hello", "test ping", " biem!test ping", "biem?test", ""] {
            let (outcome, sent) = run(&d, content).await;
            assert_eq!(outcome, DispatchOutcome::Ignored, "{content:?}");
            assert!(sent.is_empty());
        }
    }

    #[tokio::test]
    async fn test_default_implementation_with_one_argument() {
        let (outcome, sent) = run(&dispatcher(), "biem!test ping").await;
        assert_eq!(
            outcome,
            DispatchOutcome::Invoked { command: "test".into(), subcommand: None, implementation: "text" }
        );
        assert_eq!(sent, vec![(100, "text ping".to_string())]);
    }

    #[tokio::test]
    async fn test_command_name_case_insensitive() {
        let d = dispatcher();
        let (upper, _) = run(&d, "biem!TEST ping").await;
        let (lower, _) = run(&d, "biem!test ping").await;
        assert_eq!(upper, lower);
    }

    #[tokio::test]
    async fn test_mention_prefix_dispatches() {
        let (outcome, sent) = run(&dispatcher(), "<@!42> test").await;
        assert!(matches!(outcome, DispatchOutcome::Invoked { implementation: "none", .. }));
        assert_eq!(sent.len(), 1);
    }

    #[tokio::test]
    async fn test_subcommand_receives_mention() {
        let (outcome, sent) = run(&dispatcher(), "biem!test SubCommand <@77>").await;
        assert_eq!(
            outcome,
            DispatchOutcome::Invoked {
                command: "test".into(),
                subcommand: Some("SubCommand".into()),
                implementation: "user",
            }
        );
        assert_eq!(sent, vec![(100, "user 77".to_string())]);
    }

    #[tokio::test]
    async fn test_unmatched_second_token_is_an_argument() {
        let (outcome, sent) = run(&dispatcher(), "biem!test other").await;
        assert!(matches!(outcome, DispatchOutcome::Invoked { subcommand: None, implementation: "text", .. }));
        assert_eq!(sent[0].1, "text other");
    }

    #[tokio::test]
    async fn test_same_arity_picks_first_declared() {
        // "5" would coerce as a NUMBER, but "text" is declared first.
        let (outcome, _) = run(&dispatcher(), "biem!test 5").await;
        assert!(matches!(outcome, DispatchOutcome::Invoked { implementation: "text", .. }));
    }

    #[tokio::test]
    async fn test_missing_command_sends_overview() {
        let (outcome, sent) = run(&dispatcher(), "biem!   ").await;
        assert_eq!(outcome, DispatchOutcome::MissingCommand);
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.contains("`biem!test`: Echo things"));
        assert!(sent[0].1.contains("`biem!boom`"));
    }

    #[tokio::test]
    async fn test_unknown_command_single_reply_no_invocation() {
        let (outcome, sent) = run(&dispatcher(), "biem!nope ping").await;
        assert_eq!(outcome, DispatchOutcome::CommandNotFound { command: "nope".into() });
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.contains("Unknown command `nope`"));
    }

    #[tokio::test]
    async fn test_arity_mismatch() {
        let (outcome, sent) = run(&dispatcher(), "biem!test subcommand").await;
        assert_eq!(outcome, DispatchOutcome::InvalidArguments { command: "test".into(), given: 0 });
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.contains("`biem!test subcommand <@user>`"));
    }

    #[tokio::test]
    async fn test_default_usage_lists_subcommands() {
        let (outcome, sent) = run(&dispatcher(), "biem!test a b c").await;
        assert_eq!(outcome, DispatchOutcome::InvalidArguments { command: "test".into(), given: 3 });
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.contains("• `biem!test <string> <number>`"));
        assert!(sent[0].1.contains("• `biem!test subcommand <@user>`"));
    }

    #[tokio::test]
    async fn test_malformed_argument_strict() {
        let (outcome, sent) = run(&dispatcher(), "biem!test subcommand @user").await;
        match outcome {
            DispatchOutcome::MalformedArgument { command, error } => {
                assert_eq!(command, "test");
                assert_eq!(error.token, "@user");
                assert_eq!(error.kind, ArgumentKind::User);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.starts_with("Invalid argument #1"));
    }

    #[tokio::test]
    async fn test_passthrough_accepts_anything() {
        let d = dispatcher().with_coercion(CoercionMode::Passthrough);
        let (outcome, sent) = run(&d, "biem!test subcommand @user").await;
        assert!(matches!(outcome, DispatchOutcome::Invoked { implementation: "user", .. }));
        assert_eq!(sent, vec![(100, "raw @user".to_string())]);
    }

    #[tokio::test]
    async fn test_handler_error_reported_and_dispatch_continues() {
        let d = dispatcher();
        let (outcome, sent) = run(&d, "biem!boom now").await;
        assert_eq!(outcome, DispatchOutcome::Failed { command: "boom".into(), error: "boom failed".into() });
        assert_eq!(sent, vec![(100, "boom failed".to_string())]);

        let (next, _) = run(&d, "biem!test ping").await;
        assert!(matches!(next, DispatchOutcome::Invoked { .. }));
    }

    #[tokio::test]
    async fn test_handler_panic_is_caught() {
        let d = dispatcher();
        let (outcome, sent) = run(&d, "biem!boom panic").await;
        assert_eq!(outcome, DispatchOutcome::Failed { command: "boom".into(), error: "handler panicked".into() });
        assert_eq!(sent.len(), 1);

        let (next, _) = run(&d, "biem!test").await;
        assert!(matches!(next, DispatchOutcome::Invoked { .. }));
    }

    #[tokio::test]
    async fn test_send_failure_does_not_escalate() {
        let d = dispatcher();
        let outcome = d.dispatch(&msg("biem!nope"), None, Arc::new(FailingSink)).await;
        assert_eq!(outcome, DispatchOutcome::CommandNotFound { command: "nope".into() });
    }

    #[tokio::test]
    async fn test_concurrent_dispatch() {
        let d = Arc::new(dispatcher());
        let sink = Arc::new(RecordingSink::default());
        let mut tasks = Vec::new();
        for i in 0..16 {
            let d = d.clone();
            let sink = sink.clone();
            tasks.push(tokio::spawn(async move {
                d.dispatch(&msg(&format!("biem!test {i}")), None, sink).await
            }));
        }
        for task in tasks {
            assert!(matches!(task.await.unwrap(), DispatchOutcome::Invoked { .. }));
        }
        assert_eq!(sink.sent().len(), 16);
    }
}
