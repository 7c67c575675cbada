//! Experience service
//!
//! Handles XP from chat activity and peer reactions.

use chrono::{DateTime, Utc};
use rankbot_core::{Member, RankChange, ReactionRule, UserId};
use tracing::{debug, info, instrument};

use crate::dto::{MemberIdentity, MessageActivity, ReactionDenied, ReactionOutcome, ReactionReceipt};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Experience service
pub struct ExperienceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ExperienceService<'a> {
    /// Create a new ExperienceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Count a chat message: message counters, flat XP and rank promotion
    #[instrument(skip(self, identity), fields(user_id = %identity.id))]
    pub async fn record_message(&self, identity: &MemberIdentity) -> ServiceResult<MessageActivity> {
        let _guard = self.ctx.locks().lock(identity.id).await;
        let now = self.ctx.now();
        let rules = self.ctx.rules();

        let mut member = self.ctx.member_or_new(identity.id).await?;
        member.set_identity(&identity.username, &identity.first_name, &identity.last_name);
        member.messages_count = member.messages_count.saturating_add(1);
        member.daily_messages = member.daily_messages.saturating_add(1);
        member.add_xp(rules.experience.message_xp);
        member.last_active_at = now;

        let rank_change = rules.ranks.promote(&mut member);
        self.ctx.member_repo().save(&member).await?;

        if let Some(change) = rank_change {
            info!(from = change.from, to = change.to, xp = member.xp, "Rank up");
        } else {
            debug!(xp = member.xp, "Message counted");
        }

        Ok(MessageActivity {
            xp: member.xp,
            messages_count: member.messages_count,
            rank_change,
        })
    }

    /// Whether `actor` may give `kind` to `target` right now. `None` means allowed.
    #[instrument(skip(self))]
    pub async fn can_give_reaction(
        &self,
        actor: UserId,
        target: UserId,
        kind: &str,
    ) -> ServiceResult<Option<ReactionDenied>> {
        let member = self.ctx.member_or_new(actor).await?;
        Ok(self.check(&member, target, kind, self.ctx.now()).err())
    }

    /// Give a reaction: checked XP transfer from the actor's quota to the target
    #[instrument(skip(self))]
    pub async fn give_reaction(&self, actor: UserId, target: UserId, kind: &str) -> ServiceResult<ReactionOutcome> {
        let _guard = self.ctx.locks().lock_pair(actor, target).await;
        let now = self.ctx.now();

        let mut giver = self.ctx.member_or_new(actor).await?;
        let rule = match self.check(&giver, target, kind, now) {
            Ok(rule) => rule,
            Err(denied) => {
                debug!(reason = %denied, "Reaction denied");
                return Ok(ReactionOutcome::Denied(denied));
            }
        };

        note_given(&mut giver, &rule.kind, now);

        let (receiver, rank_change) = if actor == target {
            let rank_change = self.award(&mut giver, rule);
            self.ctx.member_repo().save(&giver).await?;
            (giver.clone(), rank_change)
        } else {
            let mut receiver = self.ctx.member_or_new(target).await?;
            let rank_change = self.award(&mut receiver, rule);
            self.ctx.member_repo().save(&receiver).await?;
            self.ctx.member_repo().save(&giver).await?;
            (receiver, rank_change)
        };

        info!(
            actor = %actor,
            target = %target,
            kind = %rule.kind,
            xp = rule.xp,
            "Reaction given"
        );

        Ok(ReactionOutcome::Given(ReactionReceipt {
            kind: rule.kind.clone(),
            emoji: rule.emoji.clone(),
            target,
            xp: rule.xp,
            target_xp: receiver.xp,
            given_today: giver.reaction(&rule.kind).given_today,
            daily_limit: rule.daily_limit,
            rank_change,
        }))
    }

    /// Checks in order, first failure wins: self-reaction policy, known kind,
    /// minimum rank, daily limit, cooldown
    fn check(
        &self,
        actor: &Member,
        target: UserId,
        kind: &str,
        now: DateTime<Utc>,
    ) -> Result<&'a ReactionRule, ReactionDenied> {
        let rules = self.ctx.rules();

        if actor.id == target && !rules.experience.allow_self_reaction {
            return Err(ReactionDenied::SelfReaction);
        }

        let rule = rules
            .reactions
            .get(kind)
            .ok_or_else(|| ReactionDenied::UnknownReaction {
                kind: kind.to_string(),
            })?;

        if actor.rank < rule.min_rank {
            return Err(ReactionDenied::RankTooLow {
                required: rule.min_rank,
            });
        }

        let stats = actor.reaction(kind);
        if stats.given_today >= rule.daily_limit {
            return Err(ReactionDenied::DailyLimitReached {
                limit: rule.daily_limit,
            });
        }

        if rule.cooldown_secs > 0 {
            if let Some(last) = stats.last_given_at {
                let elapsed = u64::try_from((now - last).num_seconds()).unwrap_or(0);
                if elapsed < rule.cooldown_secs {
                    return Err(ReactionDenied::CoolingDown {
                        remaining_secs: rule.cooldown_secs - elapsed,
                    });
                }
            }
        }

        Ok(rule)
    }

    fn award(&self, receiver: &mut Member, rule: &ReactionRule) -> Option<RankChange> {
        receiver.add_xp(rule.xp);
        let stats = receiver.reaction_mut(&rule.kind);
        stats.received = stats.received.saturating_add(1);
        self.ctx.rules().ranks.promote(receiver)
    }
}

fn note_given(giver: &mut Member, kind: &str, now: DateTime<Utc>) {
    let stats = giver.reaction_mut(kind);
    stats.given = stats.given.saturating_add(1);
    stats.given_today = stats.given_today.saturating_add(1);
    stats.last_given_at = Some(now);
    giver.last_active_at = now;
}
