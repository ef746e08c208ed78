//! Legal assistant chatbot.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WebError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatbotRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatbotReply {
    pub reply: String,
}

/// Answer one question with the configured assistant.
pub async fn reply(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatbotRequest>, JsonRejection>,
) -> Result<Json<ChatbotReply>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Rejected chatbot request: {}", rejection.body_text());
        WebError::BadRequest("Invalid request".to_string())
    })?;

    let assistant = state
        .assistant
        .as_ref()
        .ok_or(WebError::AssistantUnavailable)?;

    let reply = assistant.reply(&request.message).await?;
    tracing::debug!(assistant = assistant.name(), "Chatbot replied");
    Ok(Json(ChatbotReply { reply }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assistant::{async_trait, Assistant, AssistantError};
    use serde_json::{json, Value};

    use crate::testing::TestApp;

    struct EchoAssistant;

    #[async_trait]
    impl Assistant for EchoAssistant {
        async fn reply(&self, message: &str) -> Result<String, AssistantError> {
            Ok(format!("Under OHADA law: {}", message))
        }

        fn name(&self) -> &str {
            "EchoAssistant"
        }
    }

    struct DownAssistant;

    #[async_trait]
    impl Assistant for DownAssistant {
        async fn reply(&self, _message: &str) -> Result<String, AssistantError> {
            Err(AssistantError::Api {
                status: 500,
                message: "upstream exploded".to_string(),
            })
        }

        fn name(&self) -> &str {
            "DownAssistant"
        }
    }

    #[tokio::test]
    async fn test_chatbot_replies() {
        let app = TestApp::spawn_with(Some(Arc::new(EchoAssistant))).await;

        let response = app.post("/chatbot", None, json!({"message": "Can I evict?"})).await;
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"reply": "Under OHADA law: Can I evict?"}));
    }

    #[tokio::test]
    async fn test_chatbot_invalid_request() {
        let app = TestApp::spawn_with(Some(Arc::new(EchoAssistant))).await;

        let response = reqwest::Client::new()
            .post(format!("http://{}/chatbot", app.addr))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({"error": "Invalid request"}));
    }

    #[tokio::test]
    async fn test_chatbot_upstream_failures() {
        let app = TestApp::spawn().await;
        let response = app.post("/chatbot", None, json!({"message": "Hello"})).await;
        assert_eq!(response.status(), 503);

        let app = TestApp::spawn_with(Some(Arc::new(DownAssistant))).await;
        let response = app.post("/chatbot", None, json!({"message": "Hello"})).await;
        assert_eq!(response.status(), 502);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("upstream exploded"));
    }
}
