pub mod coercion;
pub mod detection;
pub mod dispatch;
pub mod handlers;
pub mod registry;
pub mod types;

pub use coercion::{coerce, coerce_all, CoercionError, CoercionMode};
pub use detection::{parse_invocation, strip_prefix};
pub use dispatch::{CommandContext, CommandHandler, DispatchOutcome, Dispatcher};
pub use handlers::{builtin_registry, PingSubcommand, TestCommand};
pub use registry::{CommandDefinition, CommandRegistry};
pub use types::{Argument, ArgumentKind, ArgumentValue, Arguments, Implementation, ParsedInvocation};

/// Build a dispatcher pre-wired with all built-in handlers.
pub fn build_default_dispatcher(prefix: impl Into<String>) -> Dispatcher {
    Dispatcher::new(builtin_registry(), prefix)
}
