//! Ports implemented by the infrastructure layers

mod clock;
mod platform;
mod repositories;

pub use clock::{next_local_midnight, start_of_local_day, Clock, ManualClock, SystemClock};
pub use platform::{ChatPlatform, PlatformError};
pub use repositories::{MemberRepository, ModerationLogRepository, RepoResult};
