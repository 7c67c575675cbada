//! Daily counter reset at local midnight

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rankbot_core::next_local_midnight;
use rankbot_service::{MaintenanceService, ServiceContext};
use tracing::{error, info};

/// Sleep used when the computed delay is not representable
const FALLBACK_DELAY: Duration = Duration::from_secs(60);

/// Time left until `target`, or zero once it has passed
pub fn delay_until(now: DateTime<Utc>, target: DateTime<Utc>) -> Duration {
    if target <= now {
        return Duration::ZERO;
    }
    (target - now).to_std().unwrap_or(FALLBACK_DELAY)
}

/// Reset daily counters every local midnight, forever.
///
/// Failures are logged and the next midnight is awaited as usual.
pub async fn run_daily_reset(ctx: Arc<ServiceContext>) {
    loop {
        let target = next_local_midnight(ctx.now());
        info!(at = %target, "Next daily reset scheduled");

        // Timers may fire slightly early; only reset once the target has passed
        loop {
            let delay = delay_until(ctx.now(), target);
            if delay.is_zero() {
                break;
            }
            tokio::time::sleep(delay).await;
        }

        match MaintenanceService::new(&ctx).reset_daily_counters().await {
            Ok(members) => info!(members, "Daily reset finished"),
            Err(e) => error!(error = %e, "Daily reset failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_delay_until_future_target() {
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 23, 0, 0).unwrap();
        let target = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        assert_eq!(delay_until(now, target), Duration::from_secs(3600));
    }

    #[test]
    fn test_delay_until_past_target_is_zero() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 1).unwrap();
        let target = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        assert_eq!(delay_until(now, target), Duration::ZERO);
        assert_eq!(delay_until(target, target), Duration::ZERO);
    }

    #[test]
    fn test_next_midnight_delay_within_a_day() {
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 12, 0, 0).unwrap();
        let delay = delay_until(now, next_local_midnight(now));
        assert!(delay > Duration::ZERO);
        assert!(delay <= Duration::from_secs(25 * 3600));
    }
}
