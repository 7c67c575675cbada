//! Profile service
//!
//! Member identity, profile cards, leaderboard and moderation history.

use rankbot_core::{Member, ModerationLogEntry, UserId};
use tracing::{debug, info, instrument};

use crate::dto::{MemberIdentity, ProfileView};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Profile service
pub struct ProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileService<'a> {
    /// Create a new ProfileService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create the member on first sight, or refresh a changed display identity
    #[instrument(skip(self, identity), fields(user_id = %identity.id))]
    pub async fn touch(&self, identity: &MemberIdentity) -> ServiceResult<Member> {
        let _guard = self.ctx.locks().lock(identity.id).await;

        let (mut member, is_new) = match self.ctx.member_repo().find_by_id(identity.id).await? {
            Some(member) => (member, false),
            None => (Member::new(identity.id, self.ctx.now()), true),
        };

        let changed = member.set_identity(&identity.username, &identity.first_name, &identity.last_name);
        if is_new || changed {
            self.ctx.member_repo().save(&member).await?;
        }

        if is_new {
            info!(name = %member.display_name(), "Member registered");
        } else if changed {
            debug!("Member identity updated");
        }

        Ok(member)
    }

    /// Member card with rank progress. Unknown members are registered.
    #[instrument(skip(self))]
    pub async fn profile(&self, user: UserId) -> ServiceResult<ProfileView> {
        let member = {
            let _guard = self.ctx.locks().lock(user).await;
            match self.ctx.member_repo().find_by_id(user).await? {
                Some(member) => member,
                None => {
                    let member = Member::new(user, self.ctx.now());
                    self.ctx.member_repo().save(&member).await?;
                    member
                }
            }
        };

        let ranks = &self.ctx.rules().ranks;
        let tier = ranks
            .tier(member.rank)
            .unwrap_or_else(|| ranks.tier_for(member.xp))
            .clone();
        let next_tier = member.rank.checked_add(1).and_then(|next| ranks.tier(next)).cloned();
        let progress = ranks.progress(member.xp);

        Ok(ProfileView {
            member,
            tier,
            next_tier,
            progress,
        })
    }

    /// Members by XP, highest first
    #[instrument(skip(self))]
    pub async fn top(&self, limit: u32) -> ServiceResult<Vec<Member>> {
        Ok(self.ctx.member_repo().top_by_xp(limit).await?)
    }

    /// Latest moderation entries targeting a member
    #[instrument(skip(self))]
    pub async fn moderation_history(&self, user: UserId, limit: u32) -> ServiceResult<Vec<ModerationLogEntry>> {
        Ok(self.ctx.moderation_log_repo().find_by_target(user, limit).await?)
    }
}
