//! AI Assistant Client
//!
//! Thin client for an external chat-completions text-generation API. The
//! core only assembles context and forwards the prompt; all generation
//! happens on the other side of this boundary.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::AssistantConfig;
use crate::error::{AppError, AppResult};

/// Client for the text-generation service
#[derive(Clone)]
pub struct AiAssistantClient {
    api_endpoint: String,
    api_key: String,
    model: String,
    http_client: Client,
}

/// One chat message
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Chat-completions request body
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

/// Chat-completions response body
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl AiAssistantClient {
    /// Build a client from configuration; `None` when the endpoint or key
    /// is not configured
    pub fn from_config(config: &AssistantConfig) -> Option<Self> {
        let api_endpoint = config.api_endpoint.clone()?;
        let api_key = config.api_key.clone()?;
        Some(Self {
            api_endpoint,
            api_key,
            model: config.model.clone(),
            http_client: Client::new(),
        })
    }

    /// Send one system + user message pair and return the generated text
    pub async fn complete(&self, system: &str, user: &str) -> AppResult<String> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
        };

        let response = self
            .http_client
            .post(&self.api_endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::AssistantError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::AssistantError(format!(
                "API returned status {}",
                response.status()
            )));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::AssistantError(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AppError::AssistantError("Empty response".to_string()))
    }
}
