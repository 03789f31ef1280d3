pub mod error;
pub mod message;
pub mod traits;

pub use error::BotError;
pub use message::{Author, IncomingMessage};
pub use traits::MessageSink;
