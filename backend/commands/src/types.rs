/// Command types: argument kinds, coerced arguments, parsed invocations.
use std::fmt;

// ---------------------------------------------------------------------------
// Argument kinds
// ---------------------------------------------------------------------------

/// Declared semantic type of a positional argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentKind {
    String,
    Number,
    User,
    Channel,
    Role,
}

impl ArgumentKind {
    /// Placeholder shown in usage lines.
    pub fn placeholder(self) -> &'static str {
        match self {
            ArgumentKind::String => "<string>",
            ArgumentKind::Number => "<number>",
            ArgumentKind::User => "<@user>",
            ArgumentKind::Channel => "<#channel>",
            ArgumentKind::Role => "<@&role>",
        }
    }
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgumentKind::String => "STRING",
            ArgumentKind::Number => "NUMBER",
            ArgumentKind::User => "USER",
            ArgumentKind::Channel => "CHANNEL",
            ArgumentKind::Role => "ROLE",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Implementation table entry
// ---------------------------------------------------------------------------

/// One entry in a handler's registration table: a named entry point and the
/// argument kinds it takes, not counting the message context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Implementation {
    pub name: &'static str,
    pub params: &'static [ArgumentKind],
}

impl Implementation {
    pub const fn new(name: &'static str, params: &'static [ArgumentKind]) -> Self {
        Self { name, params }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// `"<string> <@user>"`-style rendering of the parameter list.
    pub fn usage(&self) -> String {
        self.params
            .iter()
            .map(|k| k.placeholder())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ---------------------------------------------------------------------------
// Coerced arguments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    Text(String),
    Number(f64),
    User(u64),
    Channel(u64),
    Role(u64),
}

/// A positional argument after coercion. `raw` is always the original token.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub kind: ArgumentKind,
    pub raw: String,
    pub value: ArgumentValue,
}

impl Argument {
    pub fn as_text(&self) -> &str {
        match &self.value {
            ArgumentValue::Text(s) => s,
            _ => &self.raw,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.value {
            ArgumentValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_user(&self) -> Option<u64> {
        match self.value {
            ArgumentValue::User(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_channel(&self) -> Option<u64> {
        match self.value {
            ArgumentValue::Channel(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_role(&self) -> Option<u64> {
        match self.value {
            ArgumentValue::Role(id) => Some(id),
            _ => None,
        }
    }
}

/// Ordered arguments handed to a handler implementation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Vec<Argument>);

impl Arguments {
    pub fn new(args: Vec<Argument>) -> Self {
        Self(args)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.0.get(index)
    }

    /// Argument at `index`, or an error naming the missing position.
    pub fn require(&self, index: usize) -> anyhow::Result<&Argument> {
        self.0
            .get(index)
            .ok_or_else(|| anyhow::anyhow!("missing argument #{}", index + 1))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.0.iter()
    }

    pub fn raw(&self) -> Vec<String> {
        self.0.iter().map(|a| a.raw.clone()).collect()
    }
}

// ---------------------------------------------------------------------------
// Parsed invocation
// ---------------------------------------------------------------------------

/// A tokenized command message. `subcommand` is filled in once the
/// dispatcher has matched the second token against the definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInvocation {
    /// Lowercased command name.
    pub command: String,
    pub subcommand: Option<String>,
    /// Raw argument tokens, in order.
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREET: Implementation = Implementation::new("greet", &[ArgumentKind::String, ArgumentKind::User]);

    #[test]
    fn test_implementation_usage() {
        assert_eq!(GREET.arity(), 2);
        assert_eq!(GREET.usage(), "<string> <@user>");
    }

    #[test]
    fn test_argument_accessors() {
        let arg = Argument {
            kind: ArgumentKind::User,
            raw: "<@12>".into(),
            value: ArgumentValue::User(12),
        };
        assert_eq!(arg.as_user(), Some(12));
        assert_eq!(arg.as_channel(), None);
        assert_eq!(arg.as_text(), "<@12>");
    }

    #[test]
    fn test_require_reports_position() {
        let args = Arguments::default();
        let err = args.require(0).unwrap_err();
        assert_eq!(err.to_string(), "missing argument #1");
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ArgumentKind::Role.to_string(), "ROLE");
    }
}
