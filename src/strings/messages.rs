//! # Messages
//!
//! Reply templates posted back to the forum, plus HTTP acknowledgment bodies.

use crate::domain::types::RewardKind;

pub const GENERATION_FALLBACK: &str = "I'm having trouble thinking right now.";
pub const WAKE_UP: &str = "Bot is awake and tracking points!";

pub fn reward_claimed(user: &str, kind: RewardKind, amount: u64, total: u64) -> String {
    format!(
        "✅ @{user} claimed {}! **+{amount} Points**. Total: {total}",
        kind.keyword()
    )
}

pub fn on_cooldown(user: &str, kind: RewardKind) -> String {
    format!(
        "⏳ @{user}, you can only use /{} once every {}.",
        kind.keyword(),
        kind.period()
    )
}

pub fn points_report(user: &str, total: u64) -> String {
    format!("📊 @{user} currently has **{total} points**.")
}
