//! # Dispatch Engine
//!
//! Decides what to do with an inbound forum post: ignore it, run a points
//! command against the ledger, or hand it to the LLM, then replies on the forum.
//!
//! The engine holds no per-user state between requests. Every command loads the
//! ledger fresh and mutating commands save it back whole. Because the store is a
//! single document, all load-mutate-save cycles are serialized through one lock;
//! a per-user lock would still lose updates between different users.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::cooldown;
use crate::application::reply::ReplyEmitter;
use crate::application::resolver::CommandTable;
use crate::domain::config::AppConfig;
use crate::domain::payload::WebhookPayload;
use crate::domain::traits::{ForumPoster, LedgerStore, LlmProvider};
use crate::domain::types::{
    Command, CommandOutcome, DispatchReport, IgnoreReason, IncomingEvent, Intent, RewardKind,
};
use crate::strings::{logs, messages, prompts};

pub struct DispatchEngine {
    bot_identity: String,
    mention: String,
    require_trigger: bool,
    commands: CommandTable,
    model: String,
    store: Arc<dyn LedgerStore>,
    llm: Arc<dyn LlmProvider>,
    replies: ReplyEmitter,
    ledger_lock: Mutex<()>,
}

impl DispatchEngine {
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn LedgerStore>,
        llm: Arc<dyn LlmProvider>,
        forum: Arc<dyn ForumPoster>,
    ) -> Self {
        let bot_identity = config.bot.identity.clone();
        Self {
            mention: format!("@{bot_identity}"),
            bot_identity,
            require_trigger: config.dispatch.require_trigger,
            commands: CommandTable::from_config(config.dispatch.commands_enabled),
            model: config.generation.model.clone(),
            store,
            llm,
            replies: ReplyEmitter::new(forum),
            ledger_lock: Mutex::new(()),
        }
    }

    pub async fn dispatch(&self, payload: &WebhookPayload) -> Result<DispatchReport> {
        self.dispatch_at(payload, Utc::now()).await
    }

    /// Runs the full pipeline with `now` as the claim time.
    pub async fn dispatch_at(
        &self,
        payload: &WebhookPayload,
        now: DateTime<Utc>,
    ) -> Result<DispatchReport> {
        let event = match payload.validate() {
            Ok(event) => event,
            Err(reason) => {
                tracing::debug!("Ignoring webhook: {}", reason.as_str());
                return Ok(DispatchReport::ignored(reason));
            }
        };

        if let Some(reason) = self.screen(&event) {
            tracing::debug!(
                "Ignoring post #{} in topic {} by {}: {}",
                event.post_number,
                event.topic_id,
                event.username,
                reason.as_str()
            );
            return Ok(DispatchReport::ignored(reason));
        }

        let outcome = self.execute(&event, now).await?;
        tracing::info!(
            "Post #{} in topic {} by {} -> {}",
            event.post_number,
            event.topic_id,
            event.username,
            outcome.label()
        );

        let delivered = self.replies.emit(&event, &outcome).await;
        Ok(DispatchReport { outcome, delivered })
    }

    /// Self-post suppression, then the trigger filter.
    fn screen(&self, event: &IncomingEvent) -> Option<IgnoreReason> {
        if event.username == self.bot_identity {
            return Some(IgnoreReason::BotPost);
        }
        if self.require_trigger && !self.is_triggered(&event.raw) {
            return Some(IgnoreReason::NoTrigger);
        }
        None
    }

    fn is_triggered(&self, raw: &str) -> bool {
        raw.trim().starts_with('/') || raw.contains(&self.mention)
    }

    async fn execute(&self, event: &IncomingEvent, now: DateTime<Utc>) -> Result<CommandOutcome> {
        match self.commands.resolve(&event.raw) {
            Intent::Command(Command::Reward(kind)) => self.claim(&event.username, kind, now).await,
            Intent::Command(Command::Points) => Ok(self.report(&event.username).await),
            Intent::FreeForm => Ok(self.free_form(event).await),
        }
    }

    async fn claim(
        &self,
        username: &str,
        kind: RewardKind,
        now: DateTime<Utc>,
    ) -> Result<CommandOutcome> {
        let _guard = self.ledger_lock.lock().await;

        let mut ledger = self.store.load().await;
        let account = ledger.entry(username.to_string()).or_default();
        let last = account.last_claim(kind);

        if !cooldown::eligible(last, kind.required_hours(), now) {
            if let Some(wait) = cooldown::remaining(last, kind.required_hours(), now) {
                tracing::debug!(
                    "{} claimed {} too early, {} minutes left",
                    username,
                    kind.keyword(),
                    wait.num_minutes()
                );
            }
            return Ok(CommandOutcome::OnCooldown { kind });
        }

        let new_total = account.claim(kind, now);
        self.store.save(&ledger).await?;

        Ok(CommandOutcome::Rewarded {
            kind,
            amount: kind.amount(),
            new_total,
        })
    }

    async fn report(&self, username: &str) -> CommandOutcome {
        let ledger = {
            let _guard = self.ledger_lock.lock().await;
            self.store.load().await
        };
        let total = ledger.get(username).map(|a| a.points).unwrap_or(0);
        CommandOutcome::PointsReport { total }
    }

    async fn free_form(&self, event: &IncomingEvent) -> CommandOutcome {
        let prompt = prompts::free_form(&self.bot_identity, &event.raw);

        match self.llm.completion(&prompt, &self.model).await {
            Ok(text) if !text.trim().is_empty() => CommandOutcome::FreeForm {
                text: text.trim().to_string(),
                fallback: false,
            },
            Ok(_) => {
                tracing::warn!("{}", logs::generation_failed("empty response"));
                Self::fallback()
            }
            Err(e) => {
                tracing::warn!("{}", logs::generation_failed(&e));
                Self::fallback()
            }
        }
    }

    fn fallback() -> CommandOutcome {
        CommandOutcome::FreeForm {
            text: messages::GENERATION_FALLBACK.to_string(),
            fallback: true,
        }
    }
}
