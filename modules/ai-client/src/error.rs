use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {message}")]
    Network { message: String, retryable: bool },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Model returned no text")]
    EmptyResponse,
}

impl AiError {
    /// Timeouts, connection failures, rate limiting and 5xx responses are
    /// worth another attempt. Everything else fails the same way twice.
    pub fn is_retryable(&self) -> bool {
        match self {
            AiError::Network { retryable, .. } => *retryable,
            AiError::Api { status, .. } => *status == 429 || *status >= 500,
            AiError::Config(_) | AiError::Parse(_) | AiError::EmptyResponse => false,
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return AiError::Parse(e.to_string());
        }
        AiError::Network {
            retryable: e.is_timeout() || e.is_connect(),
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for AiError {
    fn from(e: serde_json::Error) -> Self {
        AiError::Parse(e.to_string())
    }
}
