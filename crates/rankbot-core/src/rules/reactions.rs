//! Reaction table - rank-gated, rate-limited peer endorsements

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Rules for one reaction kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ReactionRule {
    /// Kind key used in storage and callback data (e.g. `thumbs_up`)
    #[validate(length(min = 1, max = 32))]
    pub kind: String,
    #[serde(default)]
    pub emoji: String,
    /// XP transferred to the target
    pub xp: u64,
    /// Maximum given per day by one member
    pub daily_limit: u32,
    /// Minimum seconds between two uses by one member (0 disables)
    #[serde(default)]
    pub cooldown_secs: u64,
    #[validate(range(min = 1))]
    pub min_rank: u8,
}

impl ReactionRule {
    fn new(kind: &str, emoji: &str, xp: u64, daily_limit: u32, cooldown_secs: u64, min_rank: u8) -> Self {
        Self {
            kind: kind.to_string(),
            emoji: emoji.to_string(),
            xp,
            daily_limit,
            cooldown_secs,
            min_rank,
        }
    }
}

/// Registered reaction kinds, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionTable(Vec<ReactionRule>);

impl ReactionTable {
    pub fn new(rules: Vec<ReactionRule>) -> Self {
        Self(rules)
    }

    pub fn get(&self, kind: &str) -> Option<&ReactionRule> {
        self.0.iter().find(|r| r.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReactionRule> {
        self.0.iter()
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|r| r.kind.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ReactionTable {
    fn default() -> Self {
        Self(vec![
            ReactionRule::new("heart", "❤️", 1, 10, 60, 1),
            ReactionRule::new("thumbs_up", "👍", 5, 2, 300, 3),
            ReactionRule::new("nerd", "🤓", 10, 1, 0, 7),
        ])
    }
}
