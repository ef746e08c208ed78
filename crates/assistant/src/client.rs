//! OpenAI-compatible assistant.

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::AssistantConfig;
use crate::error::AssistantError;
use crate::{async_trait, Assistant};

/// Assistant that forwards each question to a chat completion API.
///
/// Every call sends the system prompt and the question; no history is kept.
pub struct OpenAiAssistant {
    client: Client,
    config: AssistantConfig,
}

impl OpenAiAssistant {
    /// Create a new assistant with the given configuration.
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantError> {
        if config.api_key.is_empty() {
            return Err(AssistantError::Configuration("API key is empty".to_string()));
        }

        let client = Client::builder().build().map_err(|e| {
            AssistantError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        info!(model = %config.model, api_url = %config.api_url, "Legal assistant initialized");

        Ok(Self { client, config })
    }

    /// Create an assistant from environment variables.
    ///
    /// See [`AssistantConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, AssistantError> {
        Self::new(AssistantConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    fn build_request(&self, message: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(&self.config.system_prompt),
                ChatMessage::user(message),
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }

    async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, AssistantError> {
        let response = self
            .client
            .post(self.config.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| AssistantError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiError>(&error_text) {
                Ok(api_error) => {
                    warn!(
                        status = status.as_u16(),
                        error_type = api_error.error.error_type.as_deref().unwrap_or("unknown"),
                        "Chat completion rejected"
                    );
                    api_error.error.message
                }
                Err(_) => error_text,
            };
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response.json().await.map_err(|e| AssistantError::Api {
            status: status.as_u16(),
            message: format!("Failed to parse response: {}", e),
        })
    }
}

#[async_trait]
impl Assistant for OpenAiAssistant {
    async fn reply(&self, message: &str) -> Result<String, AssistantError> {
        let request = self.build_request(message);
        let completion = self.chat_completion(&request).await?;

        if let Some(usage) = &completion.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Assistant token usage"
            );
        }

        completion
            .first_content()
            .map(str::to_string)
            .ok_or(AssistantError::EmptyReply)
    }

    fn name(&self) -> &str {
        "OpenAiAssistant"
    }
}
