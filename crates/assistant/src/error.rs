//! Error types for assistant calls.

use thiserror::Error;

/// Errors that can occur while asking the assistant.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The upstream API could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The upstream API answered with an error or an unreadable body.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The completion had no text in its first choice.
    #[error("Empty reply from assistant")]
    EmptyReply,
}
