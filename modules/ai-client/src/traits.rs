use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AiError;

// =============================================================================
// Message Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Model,
            content: content.into(),
        }
    }
}

// =============================================================================
// Generate Request
// =============================================================================

/// One call to a chat model: the full conversation so far, ending with the
/// turn the model should answer.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    pub messages: Vec<Message>,
    /// Ask the provider for its strict JSON output mode.
    pub json_output: bool,
}

impl GenerateRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            json_output: false,
        }
    }

    /// A history-less conversation holding a single user prompt.
    pub fn single(prompt: impl Into<String>) -> Self {
        Self::new(vec![Message::user(prompt)])
    }

    pub fn json_output(mut self) -> Self {
        self.json_output = true;
        self
    }
}

// =============================================================================
// ChatModel Trait
// =============================================================================

#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, AiError>;
}

#[async_trait]
impl<T: ChatModel + ?Sized> ChatModel for Arc<T> {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, AiError> {
        (**self).generate(request).await
    }
}
