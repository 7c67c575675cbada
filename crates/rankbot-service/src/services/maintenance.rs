//! Maintenance service - daily reset and community counters

use tracing::{info, instrument};

use crate::dto::CommunityStats;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Maintenance service
pub struct MaintenanceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MaintenanceService<'a> {
    /// Create a new MaintenanceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Zero every daily counter. Waits for in-flight member updates first.
    ///
    /// Returns the number of member records touched.
    #[instrument(skip(self))]
    pub async fn reset_daily_counters(&self) -> ServiceResult<u64> {
        let _barrier = self.ctx.locks().exclusive().await;

        let reset = self.ctx.member_repo().reset_daily_counters().await?;
        let locks_pruned = self.ctx.locks().prune();
        let windows_pruned = self.ctx.stickers().prune(self.ctx.now());

        info!(members = reset, locks_pruned, windows_pruned, "Daily counters reset");
        Ok(reset)
    }

    #[instrument(skip(self))]
    pub async fn stats(&self) -> ServiceResult<CommunityStats> {
        Ok(CommunityStats {
            members: self.ctx.member_repo().count().await?,
            moderation_logs: self.ctx.moderation_log_repo().count().await?,
        })
    }
}
