use std::time::Duration;

use anyhow::{anyhow, Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Gemini
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: Option<String>,
    pub ai_timeout: Duration,
    pub ai_max_attempts: u32,

    // Auth
    pub jwt_secret: String,

    // Web server
    pub api_host: String,
    pub api_port: u16,
    pub allowed_origins: Vec<String>,

    // Chat sessions
    pub chat_session_ttl: Duration,
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first
    /// when present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("{key} environment variable is required"))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            gemini_api_key: required("GEMINI_API_KEY")?,
            gemini_model: or_default("GEMINI_MODEL", "gemini-1.5-flash"),
            gemini_base_url: lookup("GEMINI_BASE_URL").filter(|v| !v.is_empty()),
            ai_timeout: Duration::from_secs(
                or_default("AI_TIMEOUT_SECS", "30")
                    .parse()
                    .context("AI_TIMEOUT_SECS must be a number")?,
            ),
            ai_max_attempts: or_default("AI_MAX_ATTEMPTS", "3")
                .parse()
                .context("AI_MAX_ATTEMPTS must be a number")?,
            jwt_secret: required("JWT_SECRET")?,
            api_host: or_default("API_HOST", "0.0.0.0"),
            api_port: or_default("API_PORT", "8000")
                .parse()
                .context("API_PORT must be a number")?,
            allowed_origins: or_default("ALLOWED_ORIGINS", "")
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            chat_session_ttl: Duration::from_secs(
                or_default("CHAT_SESSION_TTL_SECS", "1800")
                    .parse()
                    .context("CHAT_SESSION_TTL_SECS must be a number")?,
            ),
        })
    }
}
