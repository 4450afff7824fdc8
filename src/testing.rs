//! Test doubles for the bot's collaborators.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::traits::{ForumPoster, LedgerStore, LlmProvider};
use crate::domain::types::{Ledger, OutboundPost};
use crate::infrastructure::storage::MemoryStore;

/// Forum that records every post it is asked to create.
#[derive(Default)]
pub struct RecordingForum {
    posts: Mutex<Vec<OutboundPost>>,
    attempts: AtomicUsize,
    fail: bool,
}

impl RecordingForum {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn posts(&self) -> Vec<OutboundPost> {
        self.posts.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ForumPoster for RecordingForum {
    async fn create_post(&self, post: &OutboundPost) -> Result<(), String> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err("HTTP 502 Bad Gateway".to_string());
        }
        self.posts.lock().unwrap().push(post.clone());
        Ok(())
    }
}

/// LLM that returns a fixed answer (or error) and records prompts.
pub struct ScriptedLlm {
    answer: Result<String, String>,
    prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedLlm {
    pub fn answering(text: &str) -> Self {
        Self {
            answer: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: &str) -> Self {
        Self {
            answer: Err(err.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// `(prompt, model)` pairs in call order.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn completion(&self, prompt: &str, model: &str) -> Result<String, String> {
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), model.to_string()));
        self.answer.clone()
    }
}

/// Memory store that counts round trips and can be told to fail saves.
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    loads: AtomicUsize,
    saves: AtomicUsize,
    fail_saves: bool,
}

impl CountingStore {
    pub fn failing_saves() -> Self {
        Self {
            fail_saves: true,
            ..Default::default()
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Ledger {
        self.inner.snapshot()
    }
}

#[async_trait]
impl LedgerStore for CountingStore {
    async fn load(&self) -> Ledger {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let ledger = self.inner.load().await;
        // Widen the load/save gap so unserialized writers would interleave.
        tokio::task::yield_now().await;
        ledger
    }

    async fn save(&self, ledger: &Ledger) -> anyhow::Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves {
            anyhow::bail!("disk full");
        }
        self.inner.save(ledger).await
    }
}
