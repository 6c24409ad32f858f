use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AiConfig;
use crate::models::trip::TripContext;

const SYSTEM_PROMPT: &str = "You are a travel planner. Reply ONLY with a JSON array of activity objects, no commentary.";

// Upper bound for the HTTP client itself; the generator applies its own, shorter race
const HTTP_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("response error: {0}")]
    Response(String),
    #[error("completion adapter not configured: {0}")]
    NotConfigured(String),
}

/// Text-completion backend used for itinerary generation.
///
/// Implementations may fail or hang; callers are expected to bound them with a timeout.
#[async_trait]
pub trait CompletionAdapter: Send + Sync {
    async fn complete(&self, prompt: &str, context: &TripContext) -> Result<String, CompletionError>;
}

#[async_trait]
impl CompletionAdapter for Arc<dyn CompletionAdapter> {
    async fn complete(&self, prompt: &str, context: &TripContext) -> Result<String, CompletionError> {
        (**self).complete(prompt, context).await
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible chat completions client
#[derive(Clone)]
pub struct HttpCompletionClient {
    client: Client,
    config: AiConfig,
}

impl HttpCompletionClient {
    pub fn new(config: AiConfig) -> Result<Self, CompletionError> {
        if config.api_key.is_none() {
            return Err(CompletionError::NotConfigured("AI_API_KEY not set".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl CompletionAdapter for HttpCompletionClient {
    async fn complete(&self, prompt: &str, context: &TripContext) -> Result<String, CompletionError> {
        debug!("Requesting itinerary completion for '{}'", context.destination);

        let body = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.to_string(),
                },
            ],
            temperature: self.config.temperature,
        };

        let mut request = self
            .client
            .post(self.config.endpoint.as_str())
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CompletionError::Response(format!(
                "Completion request failed with status {}: {}",
                status, error_text
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Response(format!("Failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CompletionError::Response("Missing choices".to_string()))
    }
}
