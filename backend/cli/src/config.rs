use biembot_core::BotError;

/// Environment variable holding the chat platform token.
pub const TOKEN_VAR: &str = "BOT_TOKEN";

/// Process-level settings taken from the environment.
#[derive(Clone)]
pub struct Env {
    pub token: Option<String>,
}

impl Env {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            token: lookup(TOKEN_VAR).filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn require_token(&self) -> Result<&str, BotError> {
        self.token.as_deref().ok_or(BotError::MissingToken(TOKEN_VAR))
    }
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
