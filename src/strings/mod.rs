//! # Strings Module
//!
//! Centralizes user-facing strings, prompts, and log lines.
//! Reply wording is part of the bot's contract with forum users, so it lives here and nowhere else.

pub mod logs;
pub mod messages;
pub mod prompts;
