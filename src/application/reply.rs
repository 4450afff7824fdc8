//! # Reply Emitter
//!
//! Turns a dispatch outcome into reply text and hands it to the forum.
//! Delivery is fire-and-forget: failures are logged and reported as `false`.

use std::sync::Arc;

use crate::domain::traits::ForumPoster;
use crate::domain::types::{CommandOutcome, IncomingEvent, OutboundPost};
use crate::strings::{logs, messages};

/// Renders the reply for `outcome`, or `None` when nothing should be posted.
pub fn render(outcome: &CommandOutcome, username: &str) -> Option<String> {
    match outcome {
        CommandOutcome::Rewarded {
            kind,
            amount,
            new_total,
        } => Some(messages::reward_claimed(username, *kind, *amount, *new_total)),
        CommandOutcome::OnCooldown { kind } => Some(messages::on_cooldown(username, *kind)),
        CommandOutcome::PointsReport { total } => Some(messages::points_report(username, *total)),
        CommandOutcome::FreeForm { text, .. } => Some(text.clone()),
        CommandOutcome::Ignored { .. } => None,
    }
}

pub struct ReplyEmitter {
    forum: Arc<dyn ForumPoster>,
}

impl ReplyEmitter {
    pub fn new(forum: Arc<dyn ForumPoster>) -> Self {
        Self { forum }
    }

    /// Posts the reply as a response to the originating post. Returns whether it was delivered.
    pub async fn emit(&self, event: &IncomingEvent, outcome: &CommandOutcome) -> bool {
        let Some(raw) = render(outcome, &event.username) else {
            return false;
        };

        let post = OutboundPost {
            topic_id: event.topic_id,
            raw,
            reply_to_post_number: event.post_number,
        };

        match self.forum.create_post(&post).await {
            Ok(()) => {
                tracing::info!(
                    "Replied to {} in topic {} (post #{})",
                    event.username,
                    event.topic_id,
                    event.post_number
                );
                true
            }
            Err(e) => {
                tracing::error!("{}", logs::reply_failed(event.topic_id, &e));
                false
            }
        }
    }
}
