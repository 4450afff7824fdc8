//! OpenAI-compatible API provider
//!
//! Supports OpenAI and OpenAI-compatible APIs (Groq)

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ProviderConfig, error_message};
use crate::infrastructure::llm::{Context, Error, Provider, Response};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// HTTP client reused across requests
fn http_client() -> &'static Client {
    use std::sync::OnceLock;
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(Client::new)
}

/// OpenAI API request format
#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

/// OpenAI API response format
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn build_request(context: &Context, model: &str) -> OpenAIRequest {
    OpenAIRequest {
        model: model.to_string(),
        messages: vec![OpenAIMessage {
            role: "user".to_string(),
            content: context.prompt.clone(),
        }],
        max_tokens: context.max_tokens,
    }
}

fn extract_text(response: OpenAIResponse) -> Option<String> {
    response.choices.into_iter().next()?.message.content
}

/// Execute a chat request using OpenAI-compatible API
pub async fn chat(
    provider: Provider,
    config: ProviderConfig,
    context: Context,
) -> Result<Response, Error> {
    let name = provider.as_str();
    let base_url = config
        .base_url
        .clone()
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let model = context.model.clone().unwrap_or_else(|| {
        if config.default_model.is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            config.default_model.clone()
        }
    });

    let url = format!("{}/chat/completions", base_url.trim_end_matches('/'));

    let mut request_builder = http_client()
        .post(&url)
        .header("Authorization", format!("Bearer {}", config.api_key))
        .header("Content-Type", "application/json")
        .json(&build_request(&context, &model));

    if let Some(timeout) = config.request_timeout() {
        request_builder = request_builder.timeout(timeout);
    }

    let response = request_builder
        .send()
        .await
        .map_err(|e| Error::new(name, format!("HTTP request failed: {}", e)))?;

    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        if let Some(message) = error_message(&error_text) {
            return Err(Error::new(name, message));
        }

        return Err(Error::new(name, format!("HTTP {}: {}", status, error_text)));
    }

    let openai_response: OpenAIResponse = response
        .json()
        .await
        .map_err(|e| Error::new(name, format!("Failed to parse response: {}", e)))?;

    let served_model = openai_response.model.clone().unwrap_or(model);
    let content = extract_text(openai_response)
        .ok_or_else(|| Error::new(name, "No choices in response"))?;

    Ok(Response {
        content,
        model: served_model,
    })
}
