//! # Log Lines
//!
//! Formatted messages for the operational log.

pub const STARTING: &str = "Starting points bot...";

pub fn listening(bind: &str) -> String {
    format!("Webhook server listening on {bind}")
}

pub fn ledger_unreadable(path: &str, err: &str) -> String {
    format!(
        "Ledger at {path} could not be read ({err}); starting from an empty ledger, existing points may be lost"
    )
}

pub fn ledger_unparsable(path: &str, err: &str) -> String {
    format!(
        "Ledger at {path} is not valid JSON ({err}); starting from an empty ledger, existing points may be lost"
    )
}

pub fn timestamp_invalid(raw: &str) -> String {
    format!("Ignoring unreadable claim timestamp {raw}; treating it as never claimed")
}

pub fn reply_failed(topic_id: u64, err: &str) -> String {
    format!("Failed to post reply in topic {topic_id}: {err}")
}

pub fn generation_failed(err: &str) -> String {
    format!("Generation failed, using fallback reply: {err}")
}

pub const GENERATION_KEY_MISSING: &str =
    "No generation API key configured; free-form replies will use the fallback text";
