//! Quest service

use rankbot_core::{DomainError, Member, QuestDefinition, UserId};
use tracing::{info, instrument};

use crate::dto::{QuestBoard, QuestOutcome, QuestRejected};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Quest service
pub struct QuestService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> QuestService<'a> {
    /// Create a new QuestService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// IDs of quests unlocked at the member's rank and not completed yet
    #[instrument(skip(self))]
    pub async fn available_quests(&self, user: UserId) -> ServiceResult<Vec<String>> {
        let member = self.ctx.member_or_new(user).await?;
        Ok(self.open_quests(&member).map(|q| q.id.clone()).collect())
    }

    /// Open quests with their descriptions, plus the completed set
    #[instrument(skip(self))]
    pub async fn board(&self, user: UserId) -> ServiceResult<QuestBoard> {
        let member = self.ctx.member_or_new(user).await?;
        Ok(QuestBoard {
            available: self.open_quests(&member).cloned().collect(),
            completed: member.quests_completed.clone(),
            reward_xp: self.ctx.rules().quests.reward_xp,
        })
    }

    /// Evaluate the quest's requirement against the member's statistics
    ///
    /// # Errors
    /// Returns `DomainError::UnknownQuest` for IDs missing from the catalog
    #[instrument(skip(self))]
    pub async fn check_completion(&self, user: UserId, quest_id: &str) -> ServiceResult<bool> {
        let quest = self.find(quest_id)?;
        let member = self.ctx.member_or_new(user).await?;
        Ok(quest.requirement.is_met(&member))
    }

    /// Complete a quest: award the bonus once and record the quest ID
    ///
    /// # Errors
    /// Returns `DomainError::UnknownQuest` for IDs missing from the catalog
    #[instrument(skip(self))]
    pub async fn complete_quest(&self, user: UserId, quest_id: &str) -> ServiceResult<QuestOutcome> {
        let quest = self.find(quest_id)?;
        let _guard = self.ctx.locks().lock(user).await;
        let rules = self.ctx.rules();

        let mut member = self.ctx.member_or_new(user).await?;
        let rejected = if member.has_completed(&quest.id) {
            Some(QuestRejected::AlreadyCompleted)
        } else if !rules.quests.is_unlocked(&quest.id, member.rank) {
            Some(QuestRejected::Locked)
        } else if !quest.requirement.is_met(&member) {
            Some(QuestRejected::NotMet)
        } else {
            None
        };
        if let Some(reason) = rejected {
            return Ok(QuestOutcome::Rejected { reason });
        }

        member.mark_quest_completed(&quest.id);
        member.add_xp(rules.quests.reward_xp);
        member.last_active_at = self.ctx.now();
        let rank_change = rules.ranks.promote(&mut member);
        self.ctx.member_repo().save(&member).await?;

        info!(quest = %quest.id, reward = rules.quests.reward_xp, xp = member.xp, "Quest completed");

        Ok(QuestOutcome::Completed {
            quest_id: quest.id.clone(),
            reward_xp: rules.quests.reward_xp,
            rank_change,
        })
    }

    fn find(&self, quest_id: &str) -> Result<&'a QuestDefinition, DomainError> {
        self.ctx
            .rules()
            .quests
            .find(quest_id)
            .ok_or_else(|| DomainError::UnknownQuest(quest_id.to_string()))
    }

    fn open_quests<'m>(&self, member: &'m Member) -> impl Iterator<Item = &'a QuestDefinition> + 'm
    where
        'a: 'm,
    {
        self.ctx
            .rules()
            .quests
            .unlocked_for(member.rank)
            .filter(move |q| !member.has_completed(&q.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::Harness;
    use crate::services::ServiceError;
    use rankbot_core::MemberRepository;

    async fn give_hearts(h: &Harness, user: UserId, count: u64) {
        let mut member = h.load(user).await;
        member.reaction_mut("heart").given = count;
        h.members.save(&member).await.unwrap();
    }

    #[tokio::test]
    async fn test_brackets_accumulate() {
        let h = Harness::new().await;
        let service = QuestService::new(&h.ctx);

        let low = h.seed(10, 0, 1).await;
        assert_eq!(
            service.available_quests(low).await.unwrap(),
            vec!["sociable", "appraiser", "obedient"]
        );

        let mid = h.seed(11, 300, 4).await;
        assert_eq!(service.available_quests(mid).await.unwrap().len(), 5);

        let high = h.seed(12, 1700, 8).await;
        let ids = service.available_quests(high).await.unwrap();
        assert_eq!(ids.len(), 8);
        assert!(ids.contains(&"community_leader".to_string()));
    }

    #[tokio::test]
    async fn test_appraiser_completion_is_idempotent() {
        let h = Harness::new().await;
        let user = h.seed(10, 0, 1).await;
        let service = QuestService::new(&h.ctx);

        give_hearts(&h, user, 2).await;
        assert!(!service.check_completion(user, "appraiser").await.unwrap());
        assert_eq!(
            service.complete_quest(user, "appraiser").await.unwrap(),
            QuestOutcome::Rejected {
                reason: QuestRejected::NotMet
            }
        );

        give_hearts(&h, user, 3).await;
        assert!(service.check_completion(user, "appraiser").await.unwrap());
        let outcome = service.complete_quest(user, "appraiser").await.unwrap();
        assert!(matches!(outcome, QuestOutcome::Completed { reward_xp: 50, .. }));

        let again = service.complete_quest(user, "appraiser").await.unwrap();
        assert_eq!(
            again,
            QuestOutcome::Rejected {
                reason: QuestRejected::AlreadyCompleted
            }
        );

        let member = h.load(user).await;
        assert_eq!(member.xp, 50);
        assert_eq!(member.rank, 2);
        assert_eq!(member.quests_completed, vec!["appraiser"]);
        assert!(!service
            .available_quests(user)
            .await
            .unwrap()
            .contains(&"appraiser".to_string()));
    }

    #[tokio::test]
    async fn test_locked_quest_is_rejected() {
        let h = Harness::new().await;
        let user = h.seed(10, 0, 2).await;
        let service = QuestService::new(&h.ctx);

        let outcome = service.complete_quest(user, "sage").await.unwrap();
        assert_eq!(
            outcome,
            QuestOutcome::Rejected {
                reason: QuestRejected::Locked
            }
        );
    }

    #[tokio::test]
    async fn test_placeholder_quests_never_complete() {
        let h = Harness::new().await;
        let user = h.seed(10, 5000, 10).await;
        let service = QuestService::new(&h.ctx);

        for id in ["sociable", "obedient", "kind_soul", "sage"] {
            assert!(!service.check_completion(user, id).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_unknown_quest_is_an_error() {
        let h = Harness::new().await;
        let service = QuestService::new(&h.ctx);

        let err = service.complete_quest(UserId::new(10), "nope").await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::UnknownQuest(_))));
        assert!(err.is_user_error());
    }

    #[tokio::test]
    async fn test_board_lists_descriptions() {
        let h = Harness::new().await;
        let service = QuestService::new(&h.ctx);

        let board = service.board(UserId::new(99)).await.unwrap();
        assert_eq!(board.reward_xp, 50);
        assert_eq!(board.available.len(), 3);
        assert!(board.completed.is_empty());
    }
}
