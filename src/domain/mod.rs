//! # Domain Layer
//!
//! Core definitions, types, and traits that define the points bot's business domain.
//! Independent of specific frameworks, serving as the contract for other layers.

pub mod config;
pub mod payload;
pub mod timestamp;
pub mod traits;
pub mod types;
