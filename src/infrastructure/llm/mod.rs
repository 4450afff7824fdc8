//! # LLM Wrapper
//!
//! Minimal client for the text-generation providers used for free-form replies
//! (Gemini natively, OpenAI and OpenAI-compatible APIs such as Groq).

mod client;
pub mod providers;
mod types;

pub use client::Client;

pub use types::{Context, Error, Provider, Response};
