//! # Domain Types
//!
//! Ledger records, inbound events and the outcomes the dispatch engine produces.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::timestamp;

/// Reward state for a single forum user.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    #[serde(default)]
    pub points: u64,
    #[serde(default, with = "timestamp")]
    pub last_daily: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp")]
    pub last_weekly: Option<DateTime<Utc>>,
    #[serde(default, with = "timestamp")]
    pub last_monthly: Option<DateTime<Utc>>,
}

impl UserAccount {
    pub fn last_claim(&self, kind: RewardKind) -> Option<DateTime<Utc>> {
        match kind {
            RewardKind::Daily => self.last_daily,
            RewardKind::Weekly => self.last_weekly,
            RewardKind::Monthly => self.last_monthly,
        }
    }

    /// Adds the reward amount and stamps the matching claim time.
    /// Returns the new total.
    pub fn claim(&mut self, kind: RewardKind, now: DateTime<Utc>) -> u64 {
        self.points = self.points.saturating_add(kind.amount());
        let slot = match kind {
            RewardKind::Daily => &mut self.last_daily,
            RewardKind::Weekly => &mut self.last_weekly,
            RewardKind::Monthly => &mut self.last_monthly,
        };
        *slot = Some(now);
        self.points
    }
}

/// The whole points ledger, keyed by forum username.
pub type Ledger = HashMap<String, UserAccount>;

/// Timed reward commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RewardKind {
    Daily,
    Weekly,
    Monthly,
}

impl RewardKind {
    pub const ALL: [RewardKind; 3] = [RewardKind::Daily, RewardKind::Weekly, RewardKind::Monthly];

    pub fn keyword(&self) -> &'static str {
        match self {
            RewardKind::Daily => "daily",
            RewardKind::Weekly => "weekly",
            RewardKind::Monthly => "monthly",
        }
    }

    pub fn amount(&self) -> u64 {
        match self {
            RewardKind::Daily => 3,
            RewardKind::Weekly => 9,
            RewardKind::Monthly => 15,
        }
    }

    /// Cooldown window in hours. Monthly is a fixed 30 days, not a calendar month.
    pub fn required_hours(&self) -> i64 {
        match self {
            RewardKind::Daily => 24,
            RewardKind::Weekly => 168,
            RewardKind::Monthly => 720,
        }
    }

    /// Human readable window used in cooldown replies.
    pub fn period(&self) -> &'static str {
        match self {
            RewardKind::Daily => "24 hours",
            RewardKind::Weekly => "7 days",
            RewardKind::Monthly => "30 days",
        }
    }
}

/// A recognised bot command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reward(RewardKind),
    Points,
}

/// What a triggered message asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Command(Command),
    FreeForm,
}

/// A validated forum post, scoped to one webhook request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingEvent {
    pub username: String,
    pub raw: String,
    pub topic_id: u64,
    pub post_number: u64,
}

/// Why an event produced no reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotAPost,
    MalformedPayload,
    MalformedPost,
    BotPost,
    NoTrigger,
}

impl IgnoreReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            IgnoreReason::NotAPost => "not_a_post",
            IgnoreReason::MalformedPayload => "malformed_payload",
            IgnoreReason::MalformedPost => "malformed_post",
            IgnoreReason::BotPost => "bot_post",
            IgnoreReason::NoTrigger => "no_trigger",
        }
    }
}

/// Terminal state of a single dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Rewarded {
        kind: RewardKind,
        amount: u64,
        new_total: u64,
    },
    OnCooldown {
        kind: RewardKind,
    },
    PointsReport {
        total: u64,
    },
    /// `fallback` is set when generation failed and the apology text was used.
    FreeForm {
        text: String,
        fallback: bool,
    },
    Ignored {
        reason: IgnoreReason,
    },
}

impl CommandOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            CommandOutcome::Rewarded { .. } => "rewarded",
            CommandOutcome::OnCooldown { .. } => "on_cooldown",
            CommandOutcome::PointsReport { .. } => "points_report",
            CommandOutcome::FreeForm { .. } => "free_form",
            CommandOutcome::Ignored { .. } => "ignored",
        }
    }
}

/// Body of a reply sent to the forum's post-creation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundPost {
    pub topic_id: u64,
    pub raw: String,
    pub reply_to_post_number: u64,
}

/// Result of a dispatch as reported back to the webhook caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub outcome: CommandOutcome,
    pub delivered: bool,
}

impl DispatchReport {
    pub fn ignored(reason: IgnoreReason) -> Self {
        Self {
            outcome: CommandOutcome::Ignored { reason },
            delivered: false,
        }
    }
}
