//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (LedgerStore, ForumPoster, LlmProvider).

pub mod forum;
pub mod llm;
pub mod storage;
