//! Gemini configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use staj_core::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration for the Gemini client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub embedding_model: String,
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("GOOGLE_API_KEY"))
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Configuration(
                "GEMINI_API_KEY or GOOGLE_API_KEY environment variable not found".to_string()
            ))?;

        let timeout_secs = match lookup("GEMINI_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| Error::Configuration(
                format!("GEMINI_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw)
            ))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            api_url: lookup("GEMINI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            embedding_model: lookup("GEMINI_EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            timeout_secs,
        })
    }

    /// Create configuration with explicit values
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
