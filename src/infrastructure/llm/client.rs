//! # LLM Client
//!
//! Provides the `Client` struct, the `LlmProvider` used for free-form replies.
//! It resolves the configured provider once and routes each prompt to it.

use async_trait::async_trait;

use crate::domain::config::GenerationConfig;
use crate::domain::traits::LlmProvider;
use crate::infrastructure::llm::providers::{self, ProviderConfig};
use crate::infrastructure::llm::{Context, Error, Provider, Response};

pub struct Client {
    provider: Provider,
    config: Option<ProviderConfig>,
    max_tokens: Option<u32>,
}

impl Client {
    /// Builds a client for the configured provider. Without an API key the
    /// client still constructs, but every prompt fails.
    pub fn new(generation: &GenerationConfig, api_key: Option<String>) -> Result<Self, Error> {
        let provider = Provider::from_str(&generation.provider)
            .ok_or_else(|| Error::new(&generation.provider, "Unknown provider"))?;

        let config = api_key.map(|api_key| ProviderConfig {
            api_key,
            base_url: generation.endpoint.clone(),
            default_model: generation.model.clone(),
            timeout: Some(generation.timeout_secs),
        });

        Ok(Self {
            provider,
            config,
            max_tokens: generation.max_tokens,
        })
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Send a single-message prompt, optionally overriding the model.
    pub async fn prompt(&self, model: &str, prompt: &str) -> Result<Response, Error> {
        let config = self
            .config
            .clone()
            .ok_or_else(|| Error::new(self.provider.as_str(), "No API key configured"))?;

        let context = Context::prompt(prompt)
            .with_model(model)
            .with_max_tokens(self.max_tokens);
        providers::chat(self.provider, config, context).await
    }
}

#[async_trait]
impl LlmProvider for Client {
    async fn completion(&self, prompt: &str, model: &str) -> Result<String, String> {
        self.prompt(model, prompt)
            .await
            .map(|r| {
                tracing::debug!("Generated {} chars with {}", r.content.len(), r.model);
                r.content
            })
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!(Provider::from_str("gemini"), Some(Provider::Gemini));
        assert_eq!(Provider::from_str("Google"), Some(Provider::Gemini));
        assert_eq!(Provider::from_str("openai"), Some(Provider::OpenAI));
        assert_eq!(Provider::from_str("groq"), Some(Provider::Groq));
        assert_eq!(Provider::from_str("unknown"), None);
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let generation = GenerationConfig {
            provider: "palm".into(),
            ..Default::default()
        };
        assert!(Client::new(&generation, Some("k".into())).is_err());
    }

    #[tokio::test]
    async fn test_missing_key_fails_every_prompt() {
        let client = Client::new(&GenerationConfig::default(), None).unwrap();
        assert_eq!(client.provider(), Provider::Gemini);

        let err = client.completion("hello", "gemini-1.5-flash").await.unwrap_err();
        assert!(err.contains("No API key"));
    }
}
