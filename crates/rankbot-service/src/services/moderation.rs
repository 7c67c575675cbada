//! Moderation service
//!
//! Warns, mutes, bans and amnesty, plus the sticker spam window. Actions
//! issued by the bot itself (sticker auto-warn, warn escalation) are
//! attributed to the bot's user ID and skip the rank and daily-cap checks.

use chrono::{DateTime, Duration, Utc};
use rankbot_core::{
    start_of_local_day, ChatId, ModerationAction, ModerationPolicy, NewModerationLog, UserId,
};
use tracing::{info, instrument, warn};

use crate::dto::{ModerationDenied, ModerationOutcome, ModerationReceipt, ModeratorStats, StickerCheck};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Who is issuing an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Issuer {
    Moderator(UserId),
    System,
}

/// Moderation service
pub struct ModerationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ModerationService<'a> {
    /// Create a new ModerationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Warn a member. Reaching the warn threshold triggers an automatic ban.
    #[instrument(skip(self))]
    pub async fn warn(
        &self,
        moderator: UserId,
        target: UserId,
        chat: ChatId,
        reason: &str,
    ) -> ServiceResult<ModerationOutcome> {
        self.issue_warn(Issuer::Moderator(moderator), target, chat, reason).await
    }

    /// Mute a member for `duration_secs`, capped by the moderator's rank tier
    #[instrument(skip(self))]
    pub async fn mute(
        &self,
        moderator: UserId,
        target: UserId,
        chat: ChatId,
        duration_secs: u64,
        reason: &str,
    ) -> ServiceResult<ModerationOutcome> {
        self.restrict(
            Issuer::Moderator(moderator),
            ModerationAction::Mute,
            target,
            chat,
            duration_secs,
            reason,
        )
        .await
    }

    /// Ban a member for `duration_secs`
    #[instrument(skip(self))]
    pub async fn ban(
        &self,
        moderator: UserId,
        target: UserId,
        chat: ChatId,
        duration_secs: u64,
        reason: &str,
    ) -> ServiceResult<ModerationOutcome> {
        self.restrict(
            Issuer::Moderator(moderator),
            ModerationAction::Ban,
            target,
            chat,
            duration_secs,
            reason,
        )
        .await
    }

    /// Clear a member's warns and lift any platform restriction
    #[instrument(skip(self))]
    pub async fn amnesty(&self, moderator: UserId, target: UserId, chat: ChatId) -> ServiceResult<ModerationOutcome> {
        let policy = &self.ctx.rules().moderation;

        let actor = self.ctx.member_or_new(moderator).await?;
        if !policy.can_grant_amnesty(actor.rank) {
            return Ok(ModerationOutcome::Denied(ModerationDenied::RankTooLow {
                action: ModerationAction::Amnesty,
                required: policy.amnesty_min_rank,
            }));
        }

        if let Err(e) = self.ctx.platform().lift_restrictions(chat, target).await {
            warn!(error = %e, "Platform refused to lift restrictions");
            return Ok(ModerationOutcome::Failed { reason: e.to_string() });
        }

        let now = self.ctx.now();
        let _guard = self.ctx.locks().lock(target).await;
        let mut member = self.ctx.member_or_new(target).await?;
        member.moderation.warns = 0;
        member.moderation.last_warn_at = None;
        member.moderation.muted_until = None;
        member.moderation.banned_until = None;
        self.ctx.member_repo().save(&member).await?;

        let entry = self
            .ctx
            .moderation_log_repo()
            .append(NewModerationLog::new(
                ModerationAction::Amnesty,
                moderator,
                target,
                "Amnesty",
                now,
            ))
            .await?;

        info!(log_id = entry.id, "Amnesty granted");

        Ok(ModerationOutcome::Applied(ModerationReceipt {
            log_id: entry.id,
            action: ModerationAction::Amnesty,
            moderator,
            target,
            reason: entry.reason,
            until: None,
            target_warns: 0,
            auto_ban: None,
        }))
    }

    /// Count a sticker against the member's window and warn on spam
    #[instrument(skip(self))]
    pub async fn sticker_spam_check(&self, user: UserId, chat: ChatId) -> ServiceResult<StickerCheck> {
        let policy = &self.ctx.rules().moderation;
        let count = self.ctx.stickers().record(user, self.ctx.now());
        let spam = count > policy.max_stickers_per_minute;

        let warn = if spam {
            info!(count, "Sticker spam detected");
            Some(
                self.issue_warn(Issuer::System, user, chat, &policy.sticker_spam_reason)
                    .await?,
            )
        } else {
            None
        };

        Ok(StickerCheck { count, spam, warn })
    }

    /// Actions the moderator issued since local midnight
    #[instrument(skip(self))]
    pub async fn moderator_stats(&self, moderator: UserId) -> ServiceResult<ModeratorStats> {
        let since = start_of_local_day(self.ctx.now());
        let logs = self.ctx.moderation_log_repo();

        let warns = logs
            .count_by_moderator_since(moderator, ModerationAction::Warn, since)
            .await?;
        let mutes = logs
            .count_by_moderator_since(moderator, ModerationAction::Mute, since)
            .await?;
        let bans = logs
            .count_by_moderator_since(moderator, ModerationAction::Ban, since)
            .await?;

        Ok(ModeratorStats {
            warns,
            mutes,
            bans,
            warns_left: self
                .ctx
                .rules()
                .moderation
                .moderator_daily_warn_limit
                .map(|limit| limit.saturating_sub(warns)),
        })
    }

    // === Internals ===

    fn issuer_id(&self, issuer: Issuer) -> UserId {
        match issuer {
            Issuer::Moderator(id) => id,
            Issuer::System => self.ctx.bot_id(),
        }
    }

    async fn issue_warn(
        &self,
        issuer: Issuer,
        target: UserId,
        chat: ChatId,
        reason: &str,
    ) -> ServiceResult<ModerationOutcome> {
        let policy = &self.ctx.rules().moderation;
        let moderator = self.issuer_id(issuer);

        let (entry, warns) = {
            // The moderator's lock keeps the daily count and the append together
            let _guard = match issuer {
                Issuer::Moderator(id) => self.ctx.locks().lock_pair(id, target).await,
                Issuer::System => self.ctx.locks().lock(target).await,
            };
            let now = self.ctx.now();

            if let Issuer::Moderator(id) = issuer {
                let actor = self.ctx.member_or_new(id).await?;
                if !policy.can_warn(actor.rank) {
                    return Ok(ModerationOutcome::Denied(ModerationDenied::RankTooLow {
                        action: ModerationAction::Warn,
                        required: policy.warn_min_rank,
                    }));
                }

                if let Some(limit) = policy.moderator_daily_warn_limit {
                    let issued = self
                        .ctx
                        .moderation_log_repo()
                        .count_by_moderator_since(id, ModerationAction::Warn, start_of_local_day(now))
                        .await?;
                    if issued >= limit {
                        return Ok(ModerationOutcome::Denied(ModerationDenied::DailyWarnLimit { limit }));
                    }
                }
            }

            let mut member = self.ctx.member_or_new(target).await?;
            member.moderation.warns = member.moderation.warns.saturating_add(1);
            member.moderation.last_warn_at = Some(now);
            self.ctx.member_repo().save(&member).await?;

            let entry = self
                .ctx
                .moderation_log_repo()
                .append(NewModerationLog::new(
                    ModerationAction::Warn,
                    moderator,
                    target,
                    reason,
                    now,
                ))
                .await?;

            (entry, member.moderation.warns)
        };

        info!(log_id = entry.id, warns, "Warn issued");

        // The target's lock is released above; the ban takes it again
        let auto_ban = if warns == policy.warns_before_ban {
            let outcome = self
                .restrict(
                    Issuer::System,
                    ModerationAction::Ban,
                    target,
                    chat,
                    policy.auto_ban_duration_secs,
                    &policy.auto_ban_reason,
                )
                .await?;
            Some(Box::new(outcome))
        } else {
            None
        };

        Ok(ModerationOutcome::Applied(ModerationReceipt {
            log_id: entry.id,
            action: ModerationAction::Warn,
            moderator,
            target,
            reason: entry.reason,
            until: None,
            target_warns: warns,
            auto_ban,
        }))
    }

    /// Mute or ban: permission check, platform call, then record and log
    async fn restrict(
        &self,
        issuer: Issuer,
        action: ModerationAction,
        target: UserId,
        chat: ChatId,
        duration_secs: u64,
        reason: &str,
    ) -> ServiceResult<ModerationOutcome> {
        let policy = &self.ctx.rules().moderation;
        let moderator = self.issuer_id(issuer);

        if duration_secs < ModerationPolicy::MIN_RESTRICTION_SECS {
            return Ok(ModerationOutcome::Denied(ModerationDenied::InvalidDuration));
        }

        if let Issuer::Moderator(id) = issuer {
            let actor = self.ctx.member_or_new(id).await?;
            if let Some(denied) = self.check_restriction(action, actor.rank, duration_secs) {
                return Ok(ModerationOutcome::Denied(denied));
            }
        }

        let now = self.ctx.now();
        let Some(until) = restriction_end(now, duration_secs) else {
            return Ok(ModerationOutcome::Denied(ModerationDenied::InvalidDuration));
        };

        let platform = self.ctx.platform();
        let delegated = match action {
            ModerationAction::Ban => platform.ban_member(chat, target, until).await,
            _ => platform.restrict_member(chat, target, until).await,
        };
        if let Err(e) = delegated {
            warn!(error = %e, action = %action, "Platform refused restriction");
            return Ok(ModerationOutcome::Failed { reason: e.to_string() });
        }

        let _guard = self.ctx.locks().lock(target).await;
        let mut member = self.ctx.member_or_new(target).await?;
        let state = &mut member.moderation;
        if action == ModerationAction::Ban {
            state.bans = state.bans.saturating_add(1);
            state.banned_until = Some(until);
        } else {
            state.mutes = state.mutes.saturating_add(1);
            state.muted_until = Some(until);
        }
        self.ctx.member_repo().save(&member).await?;

        let entry = self
            .ctx
            .moderation_log_repo()
            .append(NewModerationLog::new(action, moderator, target, reason, now))
            .await?;

        info!(
            log_id = entry.id,
            action = %action,
            moderator = %moderator,
            until = %until,
            "Restriction applied"
        );

        Ok(ModerationOutcome::Applied(ModerationReceipt {
            log_id: entry.id,
            action,
            moderator,
            target,
            reason: entry.reason,
            until: Some(until),
            target_warns: member.moderation.warns,
            auto_ban: None,
        }))
    }

    fn check_restriction(&self, action: ModerationAction, rank: u8, duration_secs: u64) -> Option<ModerationDenied> {
        let policy = &self.ctx.rules().moderation;
        match action {
            ModerationAction::Ban if rank < policy.ban_min_rank => Some(ModerationDenied::RankTooLow {
                action,
                required: policy.ban_min_rank,
            }),
            ModerationAction::Ban if !policy.can_ban(rank, duration_secs) => Some(ModerationDenied::DurationTooLong {
                max_secs: policy.max_ban_duration_secs,
            }),
            ModerationAction::Mute if !policy.can_mute(rank, duration_secs) => Some(ModerationDenied::DurationTooLong {
                max_secs: policy.mute_ceiling(rank),
            }),
            _ => None,
        }
    }
}

fn restriction_end(now: DateTime<Utc>, duration_secs: u64) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(duration_secs).ok()?;
    now.checked_add_signed(Duration::try_seconds(secs)?)
}
