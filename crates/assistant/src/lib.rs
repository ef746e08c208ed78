//! Legal assistant chatbot for Lawdesk.
//!
//! This crate defines the [`Assistant`] seam the web server talks to and an
//! OpenAI-compatible implementation of it:
//!
//! - [`Assistant`] - Answers a single user question
//! - [`OpenAiAssistant`] - Chat completion client with a legal system prompt
//! - [`AssistantConfig`] - Environment and builder configuration
//! - [`AssistantError`] - Error types for assistant calls
//!
//! # Example
//!
//! ```no_run
//! use assistant::{Assistant, AssistantConfig, OpenAiAssistant};
//!
//! # async fn example() -> Result<(), assistant::AssistantError> {
//! let config = AssistantConfig::builder().api_key("sk-...").build();
//! let assistant = OpenAiAssistant::new(config)?;
//!
//! let reply = assistant.reply("How long is the statute of limitations for contracts?").await?;
//! println!("{}", reply);
//! # Ok(())
//! # }
//! ```

mod api_types;
mod client;
mod config;
mod error;

pub use api_types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
pub use client::OpenAiAssistant;
pub use config::{AssistantConfig, AssistantConfigBuilder, DEFAULT_SYSTEM_PROMPT};
pub use error::AssistantError;

// Re-export async_trait for implementors
pub use async_trait::async_trait;

/// Something that can answer a legal question.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Answer one question. No conversation state is kept between calls.
    async fn reply(&self, message: &str) -> Result<String, AssistantError>;

    /// Name used in logs.
    fn name(&self) -> &str;
}
