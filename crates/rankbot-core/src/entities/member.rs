//! Member entity - one record per chat member

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::value_objects::UserId;

/// Per-reaction-kind counters of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReactionStats {
    /// Lifetime count given to others
    pub given: u64,
    /// Lifetime count received from others
    pub received: u64,
    /// Count given since the last daily reset
    pub given_today: u32,
    /// Last time this kind was given (cooldown anchor)
    pub last_given_at: Option<DateTime<Utc>>,
}

/// Moderation counters of a member
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ModerationState {
    pub warns: u32,
    pub mutes: u32,
    pub bans: u32,
    pub last_warn_at: Option<DateTime<Utc>>,
    /// End of the last mute handed to the platform
    pub muted_until: Option<DateTime<Utc>>,
    /// End of the last ban handed to the platform
    pub banned_until: Option<DateTime<Utc>>,
}

/// Member record tracked by the bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub xp: u64,
    pub rank: u8,
    pub messages_count: u64,
    pub daily_messages: u32,
    pub reactions: BTreeMap<String, ReactionStats>,
    pub quests_completed: Vec<String>,
    pub moderation: ModerationState,
    pub joined_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl Member {
    /// Fresh record for a member seen for the first time
    pub fn new(id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            username: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            xp: 0,
            rank: 1,
            messages_count: 0,
            daily_messages: 0,
            reactions: BTreeMap::new(),
            quests_completed: Vec::new(),
            moderation: ModerationState::default(),
            joined_at: now,
            last_active_at: now,
        }
    }

    /// First and last name joined, falling back to the username and then the ID
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if !full.is_empty() {
            full.to_string()
        } else if !self.username.is_empty() {
            format!("@{}", self.username)
        } else {
            self.id.to_string()
        }
    }

    /// Counters for a reaction kind (zeroed if never used)
    pub fn reaction(&self, kind: &str) -> ReactionStats {
        self.reactions.get(kind).copied().unwrap_or_default()
    }

    /// Mutable counters for a reaction kind, created on first use
    pub fn reaction_mut(&mut self, kind: &str) -> &mut ReactionStats {
        self.reactions.entry(kind.to_string()).or_default()
    }

    /// Add experience, saturating at the numeric ceiling
    pub fn add_xp(&mut self, amount: u64) {
        self.xp = self.xp.saturating_add(amount);
    }

    #[inline]
    pub fn has_completed(&self, quest_id: &str) -> bool {
        self.quests_completed.iter().any(|q| q == quest_id)
    }

    /// Append a quest to the completed set. Returns false if already present.
    pub fn mark_quest_completed(&mut self, quest_id: &str) -> bool {
        if self.has_completed(quest_id) {
            return false;
        }
        self.quests_completed.push(quest_id.to_string());
        true
    }

    /// Update display identity; returns true when anything changed
    pub fn set_identity(&mut self, username: &str, first_name: &str, last_name: &str) -> bool {
        let changed = self.username != username
            || self.first_name != first_name
            || self.last_name != last_name;
        if changed {
            self.username = username.to_string();
            self.first_name = first_name.to_string();
            self.last_name = last_name.to_string();
        }
        changed
    }
}
