/// Argument coercion: turn raw tokens into the kinds an implementation declares.
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

use crate::types::{Argument, ArgumentKind, ArgumentValue, Arguments};

static USER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:<@!?(\d+)>|(\d+))$").unwrap());
static CHANNEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:<#(\d+)>|(\d+))$").unwrap());
static ROLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:<@&(\d+)>|(\d+))$").unwrap());

/// How declared argument kinds are enforced.
///
/// Chosen per dispatcher through `Dispatcher::with_coercion`. The `biembot`
/// binary always runs `Strict`: a plain `@user` token is rejected for a USER
/// parameter and only `<@id>`, `<@!id>` or a bare id are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoercionMode {
    /// Parse every token into its declared kind; malformed tokens are rejected.
    #[default]
    Strict,
    /// Hand every token over as text regardless of the declared kind.
    Passthrough,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{token}` is not a valid {kind} (expected {})", .kind.placeholder())]
pub struct CoercionError {
    pub position: usize,
    pub token: String,
    pub kind: ArgumentKind,
}

/// Coerce one token into `kind`.
pub fn coerce(kind: ArgumentKind, raw: &str, mode: CoercionMode) -> Option<ArgumentValue> {
    if mode == CoercionMode::Passthrough {
        debug!("Ignoring argument kind {}, using STRING", kind);
        return Some(ArgumentValue::Text(raw.to_string()));
    }

    match kind {
        ArgumentKind::String => Some(ArgumentValue::Text(raw.to_string())),
        ArgumentKind::Number => raw
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(ArgumentValue::Number),
        ArgumentKind::User => snowflake(&USER_RE, raw).map(ArgumentValue::User),
        ArgumentKind::Channel => snowflake(&CHANNEL_RE, raw).map(ArgumentValue::Channel),
        ArgumentKind::Role => snowflake(&ROLE_RE, raw).map(ArgumentValue::Role),
    }
}

/// Coerce a full token list against a parameter list of the same length.
pub fn coerce_all(
    params: &[ArgumentKind],
    tokens: &[String],
    mode: CoercionMode,
) -> Result<Arguments, CoercionError> {
    params
        .iter()
        .zip(tokens)
        .enumerate()
        .map(|(position, (&kind, token))| {
            coerce(kind, token, mode)
                .map(|value| Argument { kind, raw: token.clone(), value })
                .ok_or_else(|| CoercionError { position, token: token.clone(), kind })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Arguments::new)
}

fn snowflake(re: &Regex, raw: &str) -> Option<u64> {
    let caps = re.captures(raw)?;
    caps.get(1).or_else(|| caps.get(2))?.as_str().parse().ok()
}
