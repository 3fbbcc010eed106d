//! OpenAI-compatible chat completions backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::TextCompletionService;
use crate::errors::CompletionError;

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Connection settings for [`OpenAiCompletionService`].
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    /// Endpoint root, e.g. `https://api.openai.com`.
    pub base_url: String,
    /// Bearer credential. `None` makes every call fail with
    /// [`CompletionError::MissingCredential`].
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

/// A completion service that speaks `/v1/chat/completions`.
pub struct OpenAiCompletionService {
    settings: OpenAiSettings,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    n: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompletionService {
    pub fn new(settings: OpenAiSettings) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    fn request_body<'a>(&self, prompt: &'a str, model: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            n: 1,
        }
    }
}

/// Pull the first choice's text out of a response body.
fn extract_reply(body: &str) -> Result<String, CompletionError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or(CompletionError::EmptyChoices)?;
    Ok(choice
        .message
        .content
        .unwrap_or_default()
        .trim()
        .to_string())
}

#[async_trait]
impl TextCompletionService for OpenAiCompletionService {
    async fn try_complete(&self, prompt: &str, model: &str) -> Result<String, CompletionError> {
        let api_key = self.settings.api_key.as_deref().ok_or_else(|| {
            CompletionError::MissingCredential {
                var: API_KEY_ENV.to_string(),
            }
        })?;

        tracing::debug!(model, prompt_chars = prompt.len(), "Requesting completion");

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&self.request_body(prompt, model))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        extract_reply(&body)
    }
}
