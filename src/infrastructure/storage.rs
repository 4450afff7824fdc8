//! # Ledger Storage
//!
//! `LedgerStore` implementations. The file store keeps the whole ledger in one
//! JSON document and replaces it atomically (temp file + rename).

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::domain::traits::LedgerStore;
use crate::domain::types::Ledger;
use crate::strings::logs;

/// Ledger persisted as pretty-printed JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ledger.json".to_string());
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

#[async_trait]
impl LedgerStore for JsonFileStore {
    async fn load(&self) -> Ledger {
        let path = self.path.display().to_string();
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ledger::new(),
            Err(e) => {
                tracing::warn!("{}", logs::ledger_unreadable(&path, &e.to_string()));
                return Ledger::new();
            }
        };

        if content.trim().is_empty() {
            return Ledger::new();
        }

        match serde_json::from_str::<Ledger>(&content) {
            Ok(ledger) => ledger,
            Err(e) => {
                tracing::warn!("{}", logs::ledger_unparsable(&path, &e.to_string()));
                Ledger::new()
            }
        }
    }

    async fn save(&self, ledger: &Ledger) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(ledger).context("Failed to serialize ledger")?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .with_context(|| format!("Failed to write {}", temp.display()))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        tracing::debug!("Saved ledger with {} accounts", ledger.len());
        Ok(())
    }
}

/// Process-local ledger. Lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledger: Mutex<Ledger>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Ledger {
        self.ledger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn load(&self) -> Ledger {
        self.snapshot()
    }

    async fn save(&self, ledger: &Ledger) -> Result<()> {
        *self.ledger.lock().unwrap_or_else(PoisonError::into_inner) = ledger.clone();
        Ok(())
    }
}
