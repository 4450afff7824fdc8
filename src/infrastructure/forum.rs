//! # Discourse Adapter
//!
//! Implements `ForumPoster` against Discourse's `POST /posts.json`.
//! Requests authenticate with the `Api-Key` / `Api-Username` header pair and
//! carry a bounded timeout.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::domain::config::{AppConfig, ForumConfig};
use crate::domain::traits::ForumPoster;
use crate::domain::types::OutboundPost;

#[derive(Clone)]
pub struct DiscourseClient {
    http: Client,
    posts_url: String,
    api_key: String,
    api_username: String,
}

impl DiscourseClient {
    pub fn new(forum: &ForumConfig, api_username: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(forum.timeout_secs))
            .build()
            .context("Failed to create forum HTTP client")?;

        Ok(Self {
            http,
            posts_url: posts_url(&forum.url),
            api_key: forum.api_key.clone(),
            api_username: api_username.to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(&config.forum, &config.bot.identity)
    }
}

fn posts_url(base: &str) -> String {
    format!("{}/posts.json", base.trim_end_matches('/'))
}

#[async_trait]
impl ForumPoster for DiscourseClient {
    async fn create_post(&self, post: &OutboundPost) -> Result<(), String> {
        tracing::debug!(
            "Posting reply to topic {} (post #{})",
            post.topic_id,
            post.reply_to_post_number
        );

        let response = self
            .http
            .post(&self.posts_url)
            .header("Api-Key", &self.api_key)
            .header("Api-Username", &self.api_username)
            .header("Content-Type", "application/json")
            .json(post)
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {}", e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        // Discourse reports failures as {"errors": ["..."]}
        if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(&error_text)
            && let Some(first) = error_json
                .get("errors")
                .and_then(|e| e.as_array())
                .and_then(|a| a.first())
                .and_then(|m| m.as_str())
        {
            return Err(format!("HTTP {}: {}", status, first));
        }

        Err(format!("HTTP {}: {}", status, error_text))
    }
}
