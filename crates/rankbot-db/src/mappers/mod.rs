//! Entity <-> Model mappers
//!
//! SQLite integers are signed; counters are clamped into range on both sides.

mod member;
mod moderation_log;

pub use member::{member_from_parts, MemberRow, ReactionRow};

/// Unsigned counter to column value
pub(crate) fn to_column(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Column value to unsigned counter
pub(crate) fn from_column(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// Column value to a 32-bit counter
pub(crate) fn small_from_column(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
