//! Static rule tables loaded once at startup

mod experience;
mod moderation;
mod quests;
mod ranks;
mod reactions;

pub use experience::ExperiencePolicy;
pub use moderation::{ModerationPolicy, MuteTier};
pub use quests::{QuestBracket, QuestCatalog, QuestDefinition, QuestRequirement};
pub use ranks::{RankChange, RankProgress, RankTable, RankTier};
pub use reactions::{ReactionRule, ReactionTable};

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainError;

/// Every rule table the bot runs with
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub ranks: RankTable,
    pub reactions: ReactionTable,
    pub moderation: ModerationPolicy,
    pub quests: QuestCatalog,
    pub experience: ExperiencePolicy,
}

impl GameRules {
    /// Cross-table consistency checks. The rank table validates itself on
    /// construction.
    pub fn validate(&self) -> Result<(), DomainError> {
        let max_level = self.ranks.max_level();

        if self.reactions.is_empty() {
            return Err(DomainError::invalid_rules("no reaction kinds configured"));
        }
        for (idx, rule) in self.reactions.iter().enumerate() {
            rule.validate()
                .map_err(|e| DomainError::invalid_rules(format!("reaction {}: {e}", rule.kind)))?;
            if self.reactions.iter().take(idx).any(|r| r.kind == rule.kind) {
                return Err(DomainError::invalid_rules(format!(
                    "reaction kind '{}' is defined twice",
                    rule.kind
                )));
            }
            if rule.kind.contains(char::is_whitespace) {
                return Err(DomainError::invalid_rules(format!(
                    "reaction kind '{}' contains whitespace",
                    rule.kind
                )));
            }
            if rule.min_rank > max_level {
                return Err(DomainError::invalid_rules(format!(
                    "reaction {} requires rank {} but the top rank is {max_level}",
                    rule.kind, rule.min_rank
                )));
            }
        }

        self.moderation
            .validate()
            .map_err(|e| DomainError::invalid_rules(format!("moderation: {e}")))?;
        if self
            .moderation
            .mute_tiers
            .windows(2)
            .any(|w| w[1].max_rank <= w[0].max_rank)
        {
            return Err(DomainError::invalid_rules(
                "mute tiers must be ordered by increasing max_rank",
            ));
        }

        self.quests
            .validate()
            .map_err(|e| DomainError::invalid_rules(format!("quests: {e}")))?;
        if let Some(id) = self.quests.duplicate_id() {
            return Err(DomainError::invalid_rules(format!("quest '{id}' is defined twice")));
        }

        Ok(())
    }
}
