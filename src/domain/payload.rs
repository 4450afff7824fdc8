//! # Inbound Payload
//!
//! Typed schema for the forum's post webhook. Every field is optional at the
//! wire level; `validate` turns a payload into an `IncomingEvent` or the reason
//! it was rejected, so an unexpected shape can never fault the handler.

use serde::Deserialize;

use crate::domain::types::{IgnoreReason, IncomingEvent};

/// Top-level webhook body: `{ "post": { ... } }`. Other event kinds carry no `post`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub post: Option<serde_json::Value>,
}

/// The fields of a post the bot cares about.
#[derive(Debug, Clone, Deserialize)]
pub struct PostPayload {
    pub username: Option<String>,
    pub raw: Option<String>,
    pub topic_id: Option<u64>,
    pub post_number: Option<u64>,
}

impl WebhookPayload {
    /// Parses a raw request body.
    pub fn parse(body: &[u8]) -> Result<Self, IgnoreReason> {
        serde_json::from_slice(body).map_err(|e| {
            tracing::debug!("Rejecting webhook body: {}", e);
            IgnoreReason::MalformedPayload
        })
    }

    pub fn validate(&self) -> Result<IncomingEvent, IgnoreReason> {
        let post = match &self.post {
            None | Some(serde_json::Value::Null) => return Err(IgnoreReason::NotAPost),
            Some(value) => value,
        };

        let post: PostPayload = serde_json::from_value(post.clone()).map_err(|e| {
            tracing::debug!("Post payload has unexpected shape: {}", e);
            IgnoreReason::MalformedPost
        })?;

        match post {
            PostPayload {
                username: Some(username),
                raw: Some(raw),
                topic_id: Some(topic_id),
                post_number: Some(post_number),
            } if !username.is_empty() => Ok(IncomingEvent {
                username,
                raw,
                topic_id,
                post_number,
            }),
            _ => Err(IgnoreReason::MalformedPost),
        }
    }
}
