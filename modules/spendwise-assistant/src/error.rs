use ai_client::AiError;
use thiserror::Error;

use crate::extract::ExtractError;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("{0} is required")]
    InputMissing(&'static str),

    #[error("Chat session not initialized")]
    NoSessionActive,

    #[error("No transactions found for the user")]
    NoDataFound,

    #[error("Model call failed: {0}")]
    Upstream(#[from] AiError),

    #[error(transparent)]
    MalformedResponse(#[from] ExtractError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AssistantError {
    /// Raw model reply attached to a malformed-response failure.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            AssistantError::MalformedResponse(e) => Some(e.raw()),
            _ => None,
        }
    }
}
