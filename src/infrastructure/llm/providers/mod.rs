//! # LLM Providers
//!
//! Contains implementations for specific LLM providers (Gemini, OpenAI-compatible).

mod gemini;
mod openai;

use crate::infrastructure::llm::{Context, Error, Provider, Response};

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Configuration for a provider
#[derive(Clone)]
pub struct ProviderConfig {
    /// API key
    pub api_key: String,
    /// Base URL (for non-default endpoints)
    pub base_url: Option<String>,
    /// Default model
    pub default_model: String,
    /// Timeout in seconds
    pub timeout: Option<u64>,
}

impl ProviderConfig {
    fn request_timeout(&self) -> Option<std::time::Duration> {
        self.timeout.map(std::time::Duration::from_secs)
    }
}

/// Execute a chat request with the specified provider
pub async fn chat(
    provider: Provider,
    config: ProviderConfig,
    context: Context,
) -> Result<Response, Error> {
    match provider {
        Provider::Gemini => gemini::chat(config, context).await,
        Provider::OpenAI => openai::chat(provider, config, context).await,
        Provider::Groq => {
            // Groq uses OpenAI-compatible API
            let config_with_url = ProviderConfig {
                base_url: Some(
                    config
                        .base_url
                        .clone()
                        .unwrap_or_else(|| GROQ_BASE_URL.to_string()),
                ),
                ..config
            };
            openai::chat(provider, config_with_url, context).await
        }
    }
}

/// Pulls a provider's `{"error": {"message": ...}}` text out of a failed response body.
fn error_message(body: &str) -> Option<String> {
    let json = serde_json::from_str::<serde_json::Value>(body).ok()?;
    json.get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}
