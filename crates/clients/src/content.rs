//! AI diary content generation over an OpenAI-compatible chat API.
//!
//! The model is shown a pet photo and asked to write a short diary entry in
//! the pet's own voice plus a one-word mood. The reply is a JSON object
//! embedded as a string inside the provider's response envelope, so it is
//! parsed twice: envelope first, then the payload.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Default chat-completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default vision-capable model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default completion budget.
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Instruction sent alongside the photo.
pub const DIARY_PROMPT: &str = "You are the pet in this photo. Looking at the picture, write a \
short diary entry from your own point of view, in your own voice. Then guess the mood of the \
photo in a single word. You must reply with a JSON object of the form \
{\"content\": \"<diary entry>\", \"mood\": \"<mood>\"}.";

/// Narrative and mood produced for one photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub content: String,
    pub mood: String,
}

/// Errors from the content generator.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("Content generation request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Content generation failed ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// The provider answered but the reply could not be parsed.
    #[error("Content generation response could not be parsed: {0}")]
    Parse(String),
}

impl GenerationError {
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, GenerationError::Parse(_))
    }
}

/// Produces diary content from an image reference (URL or data URL).
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, image_url: &str) -> Result<GeneratedContent, GenerationError>;
}

// ---------------------------------------------------------------------------
// OpenAI implementation
// ---------------------------------------------------------------------------

/// Connection settings for [`OpenAiContentGenerator`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub max_tokens: u32,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Calls the chat-completions endpoint with the photo attached.
pub struct OpenAiContentGenerator {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiContentGenerator {
    pub fn new(client: reqwest::Client, config: OpenAiConfig) -> Self {
        Self { client, config }
    }

    fn build_body(&self, image_url: &str) -> serde_json::Value {
        json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "response_format": { "type": "json_object" },
            "messages": [
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": DIARY_PROMPT },
                        { "type": "image_url", "image_url": { "url": image_url } }
                    ]
                }
            ]
        })
    }

    /// Pull `choices[0].message.content` out of the provider envelope.
    fn extract_message(envelope: &serde_json::Value) -> Result<&str, GenerationError> {
        envelope
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                GenerationError::Parse(format!("unexpected response format: {envelope}"))
            })
    }

    /// Parse the model's reply, stripping markdown code fences if present.
    fn parse_payload(content: &str) -> Result<GeneratedContent, GenerationError> {
        let trimmed = content.trim();
        let json_str = match trimmed.strip_prefix("```") {
            Some(rest) => {
                let rest = rest.strip_prefix("json").unwrap_or(rest);
                rest.strip_suffix("```").unwrap_or(rest).trim()
            }
            None => trimmed,
        };

        serde_json::from_str::<GeneratedContent>(json_str).map_err(|e| {
            GenerationError::Parse(format!("invalid diary payload: {e}. Raw content: {content}"))
        })
    }
}

#[async_trait]
impl ContentGenerator for OpenAiContentGenerator {
    async fn generate(&self, image_url: &str) -> Result<GeneratedContent, GenerationError> {
        tracing::debug!(endpoint = %self.config.endpoint, model = %self.config.model, "Requesting diary content");

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&self.build_body(image_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Content generation API returned error");
            return Err(GenerationError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(format!("invalid response envelope: {e}")))?;

        let message = Self::extract_message(&envelope)?;
        let generated = Self::parse_payload(message)?;
        tracing::debug!(mood = %generated.mood, "Diary content generated");
        Ok(generated)
    }
}
