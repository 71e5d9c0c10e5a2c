mod client;
pub(crate) mod types;

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::error::AiError;
use crate::traits::{ChatModel, GenerateRequest};

use client::{GeminiClient, GEMINI_API_URL};
use types::{GenerateContentRequest, GenerationConfig};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// Gemini Agent
// =============================================================================

#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
    timeout: Duration,
    http: reqwest::Client,
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn client(&self) -> GeminiClient<'_> {
        GeminiClient::new(
            &self.api_key,
            &self.http,
            self.base_url.as_deref().unwrap_or(GEMINI_API_URL),
            self.timeout,
        )
    }
}

// =============================================================================
// ChatModel Implementation
// =============================================================================

#[async_trait]
impl ChatModel for Gemini {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, AiError> {
        let mut wire = GenerateContentRequest::from_messages(&request.messages);
        if request.json_output {
            wire = wire.generation_config(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
            });
        }

        let response = self.client().generate_content(&self.model, &wire).await?;

        match response.text() {
            Some(text) => Ok(text),
            None => {
                warn!(
                    model = %self.model,
                    block_reason = response.block_reason().unwrap_or("none"),
                    finish_reason = response
                        .candidates
                        .first()
                        .and_then(|c| c.finish_reason.as_deref())
                        .unwrap_or("none"),
                    "Gemini returned no text"
                );
                Err(AiError::EmptyResponse)
            }
        }
    }
}
