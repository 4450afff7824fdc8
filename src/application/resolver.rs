//! # Command Resolver
//!
//! Classifies a triggered message as a command or free-form chat.
//! Matching is case-insensitive substring containment, checked in table order;
//! the first keyword found anywhere in the text wins.

use crate::domain::types::{Command, Intent, RewardKind};

/// Ordered keyword → command table.
#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: Vec<(&'static str, Command)>,
}

impl CommandTable {
    /// `daily`, `weekly`, `monthly`, then `points`.
    pub fn standard() -> Self {
        let mut entries: Vec<(&'static str, Command)> = RewardKind::ALL
            .iter()
            .map(|kind| (kind.keyword(), Command::Reward(*kind)))
            .collect();
        entries.push(("points", Command::Points));
        Self { entries }
    }

    /// No commands: everything is free-form.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_config(commands_enabled: bool) -> Self {
        if commands_enabled {
            Self::standard()
        } else {
            Self::empty()
        }
    }

    pub fn resolve(&self, raw: &str) -> Intent {
        let text = raw.to_lowercase();
        self.entries
            .iter()
            .find(|(keyword, _)| text.contains(keyword))
            .map(|(_, command)| Intent::Command(*command))
            .unwrap_or(Intent::FreeForm)
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(text: &str) -> Intent {
        CommandTable::standard().resolve(text)
    }

    #[test]
    fn test_keywords() {
        assert_eq!(resolve("/daily"), Intent::Command(Command::Reward(RewardKind::Daily)));
        assert_eq!(resolve("/weekly"), Intent::Command(Command::Reward(RewardKind::Weekly)));
        assert_eq!(resolve("/MONTHLY"), Intent::Command(Command::Reward(RewardKind::Monthly)));
        assert_eq!(resolve("/points"), Intent::Command(Command::Points));
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            resolve("weekly or daily?"),
            Intent::Command(Command::Reward(RewardKind::Daily))
        );
        assert_eq!(
            resolve("daily points"),
            Intent::Command(Command::Reward(RewardKind::Daily))
        );
        assert_eq!(
            resolve("monthly points"),
            Intent::Command(Command::Reward(RewardKind::Monthly))
        );
    }

    #[test]
    fn test_containment_not_prefix() {
        assert_eq!(resolve("no points today"), Intent::Command(Command::Points));
        assert_eq!(
            resolve("@ExternalPointsBot give me my Daily"),
            Intent::Command(Command::Reward(RewardKind::Daily))
        );
    }

    #[test]
    fn test_unknown_is_free_form() {
        assert_eq!(resolve("what is /weird"), Intent::FreeForm);
        assert_eq!(resolve(""), Intent::FreeForm);
    }

    #[test]
    fn test_empty_table() {
        let table = CommandTable::from_config(false);
        assert_eq!(table.resolve("/points"), Intent::FreeForm);
        assert_eq!(table.resolve("/daily"), Intent::FreeForm);
    }
}
