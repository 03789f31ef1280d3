/// Command registry: lowercase command name → handler plus subcommands.
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::dispatch::CommandHandler;

/// A top-level command: its default handler and any named subcommands.
#[derive(Clone)]
pub struct CommandDefinition {
    pub handler: Arc<dyn CommandHandler>,
    pub subcommands: Vec<Arc<dyn CommandHandler>>,
}

impl CommandDefinition {
    pub fn new(handler: Arc<dyn CommandHandler>) -> Self {
        Self { handler, subcommands: Vec::new() }
    }

    pub fn with_subcommand(mut self, sub: Arc<dyn CommandHandler>) -> Self {
        self.subcommands.push(sub);
        self
    }

    /// First subcommand whose name equals `name`, ignoring case.
    pub fn subcommand(&self, name: &str) -> Option<&Arc<dyn CommandHandler>> {
        let lower = name.to_lowercase();
        self.subcommands.iter().find(|s| s.name().to_lowercase() == lower)
    }
}

/// Read-only after startup; shared across concurrent dispatches.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandDefinition>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a command. A duplicate name replaces the earlier entry, which is returned.
    pub fn register(
        &mut self,
        name: &str,
        handler: Arc<dyn CommandHandler>,
        subcommands: Vec<Arc<dyn CommandHandler>>,
    ) -> Option<CommandDefinition> {
        let key = name.to_lowercase();
        debug!(command = %key, subcommands = subcommands.len(), "Registering command");
        let previous = self.commands.insert(key.clone(), CommandDefinition { handler, subcommands });
        if previous.is_some() {
            warn!(command = %key, "Command registered twice; keeping the latest definition");
        }
        previous
    }

    /// Register a definition under its handler's own name.
    pub fn register_definition(&mut self, def: CommandDefinition) -> Option<CommandDefinition> {
        let name = def.handler.name().to_string();
        self.register(&name, def.handler, def.subcommands)
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(&name.to_lowercase())
    }

    /// Commands in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandDefinition)> {
        self.commands.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
