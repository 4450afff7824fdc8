//! # Main Entry Point
//!
//! Wires the forum points bot together:
//! - Domain: Configuration, Types, Payload schema
//! - Infrastructure: Ledger storage, Discourse client, LLM
//! - Application: Dispatch engine, Resolver, Cooldowns, Replies, Logging
//! - Interface: Webhook routes
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;
#[cfg(test)]
mod testing;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::engine::DispatchEngine;
use crate::domain::config::{AppConfig, LedgerBackend};
use crate::domain::traits::LedgerStore;
use crate::infrastructure::forum::DiscourseClient;
use crate::infrastructure::llm::Client as LlmClient;
use crate::infrastructure::storage::{JsonFileStore, MemoryStore};
use crate::strings::logs;

#[derive(Parser, Debug)]
#[command(name = "points-bot", about = "Forum webhook bot for points and chat replies")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "data/config.yaml")]
    config: PathBuf,

    /// Address to listen on (overrides config and BIND_ADDR)
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load Configuration
    let mut config = AppConfig::load(&cli.config)?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    let config = config.validate().context("Invalid configuration")?;

    // 2. Logging Setup
    let _log_guard = application::logging::init(&config.logging)?;
    tracing::info!("{}", logs::STARTING);

    // 3. Initialize Infrastructure
    let store: Arc<dyn LedgerStore> = match config.ledger.backend {
        LedgerBackend::File => {
            let file_store = JsonFileStore::new(&config.ledger.path);
            tracing::info!("Ledger file: {}", file_store.path().display());
            Arc::new(file_store)
        }
        LedgerBackend::Memory => {
            tracing::warn!("Using in-memory ledger; points are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let api_key = config.generation_api_key();
    if api_key.is_none() {
        tracing::warn!("{}", logs::GENERATION_KEY_MISSING);
    }
    let llm = Arc::new(LlmClient::new(&config.generation, api_key)?);
    tracing::info!(
        "Generation provider: {} ({})",
        llm.provider().as_str(),
        config.generation.model
    );
    let forum = Arc::new(DiscourseClient::from_config(&config)?);

    // 4. Dispatch Engine
    let engine = Arc::new(DispatchEngine::new(&config, store, llm, forum));
    tracing::info!(
        "Bot identity: {} (require_trigger={}, commands_enabled={})",
        config.bot.identity,
        config.dispatch.require_trigger,
        config.dispatch.commands_enabled
    );

    // 5. Serve
    let app = interface::webhook::router(engine);
    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    tracing::info!("{}", logs::listening(&config.server.bind));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Webhook server failed")?;

    tracing::info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Unable to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
