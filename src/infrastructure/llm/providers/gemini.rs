//! Gemini provider
//!
//! Calls `models/{model}:generateContent` with the prompt as a single user turn.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ProviderConfig, error_message};
use crate::infrastructure::llm::{Context, Error, Response};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// HTTP client reused across requests
fn http_client() -> &'static Client {
    use std::sync::OnceLock;
    static CLIENT: OnceLock<Client> = OnceLock::new();
    CLIENT.get_or_init(Client::new)
}

/// Gemini API request format
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// Gemini content (message)
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

/// Gemini content part
#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

/// Gemini API response format
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

fn build_request(context: &Context) -> GeminiRequest {
    GeminiRequest {
        contents: vec![GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: context.prompt.clone(),
            }],
        }],
        generation_config: context.max_tokens.map(|max_output_tokens| GenerationConfig {
            max_output_tokens,
        }),
    }
}

fn extract_text(response: GeminiResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text = content
        .parts
        .into_iter()
        .map(|part| part.text)
        .collect::<Vec<_>>()
        .join("\n");
    Some(text)
}

/// Execute a chat request using Gemini's API
pub async fn chat(config: ProviderConfig, context: Context) -> Result<Response, Error> {
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

    let url = format!(
        "{}/v1beta/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    );

    let mut request_builder = http_client()
        .post(&url)
        .header("x-goog-api-key", &config.api_key)
        .header("Content-Type", "application/json")
        .json(&build_request(&context));

    if let Some(timeout) = config.request_timeout() {
        request_builder = request_builder.timeout(timeout);
    }

    let response = request_builder
        .send()
        .await
        .map_err(|e| Error::new("gemini", format!("HTTP request failed: {}", e)))?;

    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        if let Some(message) = error_message(&error_text) {
            return Err(Error::new("gemini", message));
        }

        return Err(Error::new(
            "gemini",
            format!("HTTP {}: {}", status, error_text),
        ));
    }

    let gemini_response: GeminiResponse = response
        .json()
        .await
        .map_err(|e| Error::new("gemini", format!("Failed to parse response: {}", e)))?;

    let content = extract_text(gemini_response)
        .ok_or_else(|| Error::new("gemini", "No candidates in response"))?;

    Ok(Response { content, model })
}
