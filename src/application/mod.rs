//! # Application Layer
//!
//! Contains the core business logic and orchestration of the bot.
//! This includes the dispatch engine, command resolution, cooldowns and reply formatting.

pub mod cooldown;
pub mod engine;
pub mod logging;
pub mod reply;
pub mod resolver;
