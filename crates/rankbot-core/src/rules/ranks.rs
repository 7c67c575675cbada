//! Rank engine
//!
//! Ranks are ordered tiers starting at level 1, each with a minimum
//! cumulative XP threshold. Thresholds never decrease from one tier to the next.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::Member;
use crate::error::DomainError;

/// A single rank tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RankTier {
    #[validate(range(min = 1))]
    pub level: u8,
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    pub xp_required: u64,
    /// Decoration shown in front of the member's name
    #[serde(default)]
    pub symbols: String,
}

impl RankTier {
    fn new(level: u8, name: &str, emoji: &str, xp_required: u64, symbols: &str) -> Self {
        Self {
            level,
            name: name.to_string(),
            emoji: emoji.to_string(),
            xp_required,
            symbols: symbols.to_string(),
        }
    }

    /// Full title: decoration, name and emoji
    pub fn title(&self) -> String {
        [self.symbols.as_str(), self.name.as_str(), self.emoji.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Progress of an XP total through the rank table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankProgress {
    pub current: u8,
    /// Next tier, or `current` at the top
    pub next: u8,
    pub xp: u64,
    pub current_threshold: u64,
    pub next_threshold: u64,
    /// XP still missing to reach `next_threshold`
    pub xp_to_next: u64,
    /// 0..=100
    pub percent: f64,
}

impl RankProgress {
    #[inline]
    pub fn is_max(&self) -> bool {
        self.current == self.next
    }
}

/// A stored rank promotion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankChange {
    pub from: u8,
    pub to: u8,
}

/// Validated, non-empty rank table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RankTier>", into = "Vec<RankTier>")]
pub struct RankTable {
    tiers: Vec<RankTier>,
}

impl RankTable {
    /// Build a table, checking levels are 1..=n, the first threshold is 0 and
    /// thresholds are non-decreasing
    pub fn new(tiers: Vec<RankTier>) -> Result<Self, DomainError> {
        if tiers.is_empty() {
            return Err(DomainError::invalid_rules("rank table is empty"));
        }
        if tiers.len() > usize::from(u8::MAX) {
            return Err(DomainError::invalid_rules("rank table has too many tiers"));
        }

        for (idx, tier) in tiers.iter().enumerate() {
            tier.validate()
                .map_err(|e| DomainError::invalid_rules(format!("rank {}: {e}", tier.level)))?;

            if usize::from(tier.level) != idx + 1 {
                return Err(DomainError::invalid_rules(format!(
                    "rank levels must be contiguous from 1, found {} at position {}",
                    tier.level,
                    idx + 1
                )));
            }
        }

        if tiers[0].xp_required != 0 {
            return Err(DomainError::invalid_rules("first rank must require 0 XP"));
        }

        if let Some(pair) = tiers.windows(2).find(|w| w[1].xp_required < w[0].xp_required) {
            return Err(DomainError::invalid_rules(format!(
                "rank {} requires less XP than rank {}",
                pair[1].level, pair[0].level
            )));
        }

        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[RankTier] {
        &self.tiers
    }

    /// Highest level in the table
    pub fn max_level(&self) -> u8 {
        u8::try_from(self.tiers.len()).unwrap_or(u8::MAX)
    }

    pub fn tier(&self, level: u8) -> Option<&RankTier> {
        usize::from(level)
            .checked_sub(1)
            .and_then(|idx| self.tiers.get(idx))
    }

    /// Index of the highest tier whose threshold is <= xp
    fn index_for(&self, xp: u64) -> usize {
        self.tiers
            .iter()
            .rposition(|t| xp >= t.xp_required)
            .unwrap_or(0)
    }

    /// Rank level implied by an XP total
    pub fn level_for(&self, xp: u64) -> u8 {
        self.tiers[self.index_for(xp)].level
    }

    /// Tier implied by an XP total
    pub fn tier_for(&self, xp: u64) -> &RankTier {
        &self.tiers[self.index_for(xp)]
    }

    /// Current tier, next tier and percentage progress between them
    pub fn progress(&self, xp: u64) -> RankProgress {
        let idx = self.index_for(xp);
        let current = &self.tiers[idx];
        let next = self.tiers.get(idx + 1).unwrap_or(current);

        let span = next.xp_required - current.xp_required;
        let percent = if span == 0 {
            100.0
        } else {
            let gained = xp - current.xp_required;
            (gained as f64 / span as f64 * 100.0).min(100.0)
        };

        RankProgress {
            current: current.level,
            next: next.level,
            xp,
            current_threshold: current.xp_required,
            next_threshold: next.xp_required,
            xp_to_next: next.xp_required.saturating_sub(xp),
            percent,
        }
    }

    /// Raise the stored rank to the one implied by the member's XP.
    ///
    /// Never lowers the stored rank and never goes past the top tier.
    pub fn promote(&self, member: &mut Member) -> Option<RankChange> {
        let implied = self.level_for(member.xp);
        let stored = member.rank.min(self.max_level());
        if implied > stored {
            member.rank = implied;
            Some(RankChange {
                from: stored,
                to: implied,
            })
        } else {
            None
        }
    }
}

impl TryFrom<Vec<RankTier>> for RankTable {
    type Error = DomainError;

    fn try_from(tiers: Vec<RankTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<RankTable> for Vec<RankTier> {
    fn from(table: RankTable) -> Self {
        table.tiers
    }
}

impl Default for RankTable {
    fn default() -> Self {
        Self {
            tiers: vec![
                RankTier::new(1, "Lurker", "🕶️", 0, "✦"),
                RankTier::new(2, "Newbie", "🐣", 50, "✦✦"),
                RankTier::new(3, "Contactor", "📡", 150, "✦✦✦"),
                RankTier::new(4, "Memologist", "🎭", 300, "✦✦✦✦"),
                RankTier::new(5, "Guru", "🧠", 500, "✦✦✦✦✦"),
                RankTier::new(6, "Creator", "✨", 800, "✦✦✦✦✦✦"),
                RankTier::new(7, "Moderator", "⚖️", 1200, "✦✦✦✦✦✦✦"),
                RankTier::new(8, "Integrator", "🔗", 1700, "✦✦✦✦✦✦✦✦"),
                RankTier::new(9, "Legend", "🏆", 2300, "✦✦✦✦✦✦✦✦✦"),
                RankTier::new(10, "Developer", "👨‍💻", 999_999, "⭐"),
            ],
        }
    }
}
