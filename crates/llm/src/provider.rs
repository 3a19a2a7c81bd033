//! Completion provider abstraction and the OpenAI-compatible client.

use crate::config::AiConfig;
use crate::{ProviderError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// A successful completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    pub tokens_used: u64,
}

/// Something that turns a system + user prompt into text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<Completion>;

    /// Model name reported in outcomes and history.
    fn model(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    total_tokens: u64,
}

/// Client for any endpoint speaking the OpenAI chat completions API
/// (OpenAI itself, Groq).
pub struct OpenAiCompatible {
    client: Client,
    config: AiConfig,
    api_key: String,
}

impl OpenAiCompatible {
    /// Fails with `Unconfigured` when the config has no API key.
    pub fn new(config: AiConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Unconfigured(e.to_string()))?;

        tracing::info!(
            provider = %config.provider,
            model = %config.model,
            "AI client initialized"
        );
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatible {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<Completion> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let resp = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let body = resp.text().await?;
        parse_completion(&body)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

/// Map a non-success HTTP status to a provider error.
pub fn classify_status(status: StatusCode, body: &str) -> ProviderError {
    let message = format!("{status}: {}", body.trim());
    if status == StatusCode::TOO_MANY_REQUESTS {
        ProviderError::RateLimited(message)
    } else if status.is_server_error() {
        ProviderError::Transient(message)
    } else {
        ProviderError::Fatal(message)
    }
}

/// Extract the first choice and token usage from a chat completions body.
pub fn parse_completion(body: &str) -> Result<Completion> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| ProviderError::InvalidResponse("no choices in response".to_string()))?;

    Ok(Completion {
        content,
        tokens_used: response.usage.map(|u| u.total_tokens).unwrap_or(0),
    })
}
