//! # Domain Traits
//!
//! Abstract interfaces for the bot's collaborators (ledger storage, forum, LLM).
//! Allows for pluggable implementations in the Infrastructure layer.

use async_trait::async_trait;

use crate::domain::types::{Ledger, OutboundPost};

/// Persistence for the points ledger.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Load the full ledger. Never fails: a missing or unreadable backing
    /// resource yields an empty ledger.
    async fn load(&self) -> Ledger;

    /// Replace the stored ledger with `ledger`.
    async fn save(&self, ledger: &Ledger) -> anyhow::Result<()>;
}

/// Abstract interface for the forum the bot replies on (e.g., Discourse)
#[async_trait]
pub trait ForumPoster: Send + Sync {
    /// Create a post in reply to another post.
    async fn create_post(&self, post: &OutboundPost) -> Result<(), String>;
}

/// Abstract interface for an LLM Provider
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion
    async fn completion(&self, prompt: &str, model: &str) -> Result<String, String>;
}
