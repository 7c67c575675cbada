//! Quest catalog
//!
//! Quests are grouped in rank brackets. A bracket is unlocked once the
//! member's rank reaches its `min_rank`, and unlocked brackets accumulate.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::Member;

/// Predicate a member must satisfy to complete a quest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestRequirement {
    /// Give at least `count` reactions of `kind` to others
    ReactionsGiven { kind: String, count: u64 },
    /// No statistic backs this quest yet; never completes
    Untracked,
}

impl QuestRequirement {
    pub fn is_met(&self, member: &Member) -> bool {
        match self {
            Self::ReactionsGiven { kind, count } => member.reaction(kind).given >= *count,
            Self::Untracked => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct QuestDefinition {
    /// Stable identifier stored in the member's completed set
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub requirement: QuestRequirement,
}

impl QuestDefinition {
    fn new(id: &str, title: &str, description: &str, requirement: QuestRequirement) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            requirement,
        }
    }

    fn untracked(id: &str, title: &str, description: &str) -> Self {
        Self::new(id, title, description, QuestRequirement::Untracked)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct QuestBracket {
    pub name: String,
    #[validate(range(min = 1))]
    pub min_rank: u8,
    #[validate(nested)]
    pub quests: Vec<QuestDefinition>,
}

/// All quests with the one-time completion reward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct QuestCatalog {
    pub reward_xp: u64,
    #[validate(nested)]
    pub brackets: Vec<QuestBracket>,
}

impl QuestCatalog {
    /// Quests unlocked at `rank`, in bracket order
    pub fn unlocked_for(&self, rank: u8) -> impl Iterator<Item = &QuestDefinition> {
        self.brackets
            .iter()
            .filter(move |b| rank >= b.min_rank)
            .flat_map(|b| b.quests.iter())
    }

    pub fn find(&self, quest_id: &str) -> Option<&QuestDefinition> {
        self.brackets
            .iter()
            .flat_map(|b| b.quests.iter())
            .find(|q| q.id == quest_id)
    }

    pub fn is_unlocked(&self, quest_id: &str, rank: u8) -> bool {
        self.unlocked_for(rank).any(|q| q.id == quest_id)
    }

    /// First duplicated quest ID, if any
    pub fn duplicate_id(&self) -> Option<&str> {
        let all: Vec<&str> = self
            .brackets
            .iter()
            .flat_map(|b| b.quests.iter())
            .map(|q| q.id.as_str())
            .collect();
        all.iter()
            .enumerate()
            .find(|(idx, id)| all[..*idx].contains(id))
            .map(|(_, id)| *id)
    }
}

impl Default for QuestCatalog {
    fn default() -> Self {
        Self {
            reward_xp: 50,
            brackets: vec![
                QuestBracket {
                    name: "1-3".to_string(),
                    min_rank: 1,
                    quests: vec![
                        QuestDefinition::untracked(
                            "sociable",
                            "Sociable 💬",
                            "Be in the top 3 by messages today",
                        ),
                        QuestDefinition::new(
                            "appraiser",
                            "Appraiser ❤️",
                            "Give 3 ❤️ to other members",
                            QuestRequirement::ReactionsGiven {
                                kind: "heart".to_string(),
                                count: 3,
                            },
                        ),
                        QuestDefinition::untracked(
                            "obedient",
                            "Obedient 😇",
                            "Go a whole day without punishments",
                        ),
                    ],
                },
                QuestBracket {
                    name: "4-7".to_string(),
                    min_rank: 4,
                    quests: vec![
                        QuestDefinition::untracked("kind_soul", "Kind soul 👍", "Give 👍 to newcomers"),
                        QuestDefinition::untracked("overseer", "Overseer ⚠️", "Help keep order in the chat"),
                    ],
                },
                QuestBracket {
                    name: "8-10".to_string(),
                    min_rank: 8,
                    quests: vec![
                        QuestDefinition::untracked("sage", "Sage 🤓", "Share useful knowledge"),
                        QuestDefinition::untracked(
                            "content_maker",
                            "Content maker 🎨",
                            "Post original content",
                        ),
                        QuestDefinition::untracked(
                            "community_leader",
                            "Community leader 👑",
                            "Lead community activities",
                        ),
                    ],
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::UserId;
    use chrono::Utc;

    fn ids(catalog: &QuestCatalog, rank: u8) -> Vec<&str> {
        catalog.unlocked_for(rank).map(|q| q.id.as_str()).collect()
    }

    #[test]
    fn test_brackets_are_additive() {
        let catalog = QuestCatalog::default();
        assert_eq!(ids(&catalog, 1), ["sociable", "appraiser", "obedient"]);
        assert_eq!(ids(&catalog, 3).len(), 3);
        assert_eq!(ids(&catalog, 4).len(), 5);
        assert_eq!(ids(&catalog, 7).len(), 5);
        assert_eq!(ids(&catalog, 8).len(), 8);
        assert_eq!(ids(&catalog, 10).len(), 8);
    }

    #[test]
    fn test_is_unlocked() {
        let catalog = QuestCatalog::default();
        assert!(catalog.is_unlocked("appraiser", 1));
        assert!(!catalog.is_unlocked("overseer", 3));
        assert!(catalog.is_unlocked("overseer", 4));
        assert!(!catalog.is_unlocked("missing", 10));
    }

    #[test]
    fn test_appraiser_requirement() {
        let catalog = QuestCatalog::default();
        let quest = catalog.find("appraiser").unwrap();
        let mut member = Member::new(UserId::new(1), Utc::now());

        member.reaction_mut("heart").given = 2;
        assert!(!quest.requirement.is_met(&member));

        member.reaction_mut("heart").given = 3;
        assert!(quest.requirement.is_met(&member));
    }

    #[test]
    fn test_untracked_never_met() {
        let member = Member::new(UserId::new(1), Utc::now());
        assert!(!QuestRequirement::Untracked.is_met(&member));
    }

    #[test]
    fn test_default_catalog_has_unique_ids() {
        let catalog = QuestCatalog::default();
        assert!(catalog.duplicate_id().is_none());
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_duplicate_id_detected() {
        let mut catalog = QuestCatalog::default();
        let copy = catalog.brackets[0].quests[1].clone();
        catalog.brackets[2].quests.push(copy);
        assert_eq!(catalog.duplicate_id(), Some("appraiser"));
    }

    #[test]
    fn test_requirement_deserializes_tagged() {
        let json = r#"{"type": "reactions_given", "kind": "nerd", "count": 2}"#;
        let req: QuestRequirement = serde_json::from_str(json).unwrap();
        assert_eq!(
            req,
            QuestRequirement::ReactionsGiven {
                kind: "nerd".to_string(),
                count: 2
            }
        );
    }
}
