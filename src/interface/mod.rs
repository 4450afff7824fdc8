//! # Interface Layer
//!
//! HTTP surface of the bot: the forum webhook and the keep-alive endpoints.

pub mod webhook;
