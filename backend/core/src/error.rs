use thiserror::Error;

/// Top-level error type for the BiemBot runtime.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("missing chat platform token: set {0}")]
    MissingToken(&'static str),

    #[error("failed to send message to channel {channel_id}: {message}")]
    Send { channel_id: u64, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_error_names_channel() {
        let err = BotError::Send { channel_id: 7, message: "Missing Access".into() };
        assert_eq!(err.to_string(), "failed to send message to channel 7: Missing Access");
    }

    #[test]
    fn test_send_error_converts_to_anyhow() {
        let err: anyhow::Error = BotError::Send { channel_id: 1, message: "x".into() }.into();
        assert!(matches!(err.downcast_ref::<BotError>(), Some(BotError::Send { channel_id: 1, .. })));
    }
}
