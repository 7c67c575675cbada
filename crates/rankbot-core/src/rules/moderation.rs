//! Moderation thresholds and rank-tiered permissions

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Mute ceiling for moderators up to `max_rank`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuteTier {
    pub max_rank: u8,
    pub max_duration_secs: u64,
}

/// Moderation policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ModerationPolicy {
    #[validate(range(min = 1))]
    pub warn_min_rank: u8,
    #[validate(range(min = 1))]
    pub ban_min_rank: u8,
    #[validate(range(min = 1))]
    pub amnesty_min_rank: u8,
    #[validate(range(min = 30))]
    pub max_ban_duration_secs: u64,
    /// Ordered by `max_rank`; ranks above the last tier use the last ceiling
    #[validate(length(min = 1))]
    pub mute_tiers: Vec<MuteTier>,
    /// Warn count that triggers the automatic ban
    #[validate(range(min = 1))]
    pub warns_before_ban: u32,
    #[validate(range(min = 30))]
    pub auto_ban_duration_secs: u64,
    #[validate(length(min = 1))]
    pub auto_ban_reason: String,
    pub sticker_spam_reason: String,
    #[validate(range(min = 1))]
    pub max_stickers_per_minute: usize,
    #[validate(range(min = 1, max = 86_400))]
    pub sticker_window_secs: u64,
    /// Warns one moderator may issue per local day (`None` disables the cap)
    pub moderator_daily_warn_limit: Option<u32>,
}

impl ModerationPolicy {
    /// Shortest restriction the platform honours; anything shorter is permanent
    pub const MIN_RESTRICTION_SECS: u64 = 30;

    pub fn can_warn(&self, rank: u8) -> bool {
        rank >= self.warn_min_rank
    }

    /// Longest mute a moderator of this rank may hand out
    pub fn mute_ceiling(&self, rank: u8) -> u64 {
        self.mute_tiers
            .iter()
            .find(|tier| rank <= tier.max_rank)
            .or_else(|| self.mute_tiers.last())
            .map_or(0, |tier| tier.max_duration_secs)
    }

    pub fn can_mute(&self, rank: u8, duration_secs: u64) -> bool {
        duration_secs <= self.mute_ceiling(rank)
    }

    pub fn can_ban(&self, rank: u8, duration_secs: u64) -> bool {
        rank >= self.ban_min_rank && duration_secs <= self.max_ban_duration_secs
    }

    pub fn can_grant_amnesty(&self, rank: u8) -> bool {
        rank >= self.amnesty_min_rank
    }
}

impl Default for ModerationPolicy {
    fn default() -> Self {
        Self {
            warn_min_rank: 4,
            ban_min_rank: 8,
            amnesty_min_rank: 8,
            max_ban_duration_secs: 2_592_000,
            mute_tiers: vec![
                MuteTier {
                    max_rank: 3,
                    max_duration_secs: 300,
                },
                MuteTier {
                    max_rank: 7,
                    max_duration_secs: 1800,
                },
                MuteTier {
                    max_rank: u8::MAX,
                    max_duration_secs: 604_800,
                },
            ],
            warns_before_ban: 3,
            auto_ban_duration_secs: 86_400,
            auto_ban_reason: "Too many warnings".to_string(),
            sticker_spam_reason: "Sticker spam".to_string(),
            max_stickers_per_minute: 5,
            sticker_window_secs: 60,
            moderator_daily_warn_limit: Some(2),
        }
    }
}
