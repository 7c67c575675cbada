//! Inline keyboard callback payloads

use std::fmt;

use rankbot_core::UserId;

/// Mute durations offered by the moderation menu
pub const MUTE_5MIN_SECS: u64 = 300;
pub const MUTE_30MIN_SECS: u64 = 1800;
pub const MUTE_7DAYS_SECS: u64 = 604_800;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    Profile,
    Top,
    Quests,
    Rules,
    MainMenu,
    Moderation,
    JoinCommunity,
    /// `react_<kind>_<target>`; the kind itself may contain underscores
    React { kind: String, target: UserId },
    /// `quest_<id>`
    Quest(String),
    Mute { duration_secs: u64 },
    Warn,
    Ban,
    Amnesty,
    HelpAdmin,
    ModStats,
}

impl Callback {
    pub fn parse(data: &str) -> Option<Self> {
        let callback = match data {
            "profile" => Self::Profile,
            "top" => Self::Top,
            "quests" => Self::Quests,
            "rules" => Self::Rules,
            "main_menu" => Self::MainMenu,
            "moderation" => Self::Moderation,
            "join_community" => Self::JoinCommunity,
            "mute_5min" => Self::Mute {
                duration_secs: MUTE_5MIN_SECS,
            },
            "mute_30min" => Self::Mute {
                duration_secs: MUTE_30MIN_SECS,
            },
            "mute_7days" => Self::Mute {
                duration_secs: MUTE_7DAYS_SECS,
            },
            "warn" => Self::Warn,
            "ban" => Self::Ban,
            "amnesty" => Self::Amnesty,
            "help_admin" => Self::HelpAdmin,
            "mod_stats" => Self::ModStats,
            other => {
                if let Some(rest) = other.strip_prefix("react_") {
                    let (kind, target) = rest.rsplit_once('_')?;
                    if kind.is_empty() {
                        return None;
                    }
                    Self::React {
                        kind: kind.to_string(),
                        target: UserId::parse(target).ok()?,
                    }
                } else if let Some(id) = other.strip_prefix("quest_") {
                    if id.is_empty() {
                        return None;
                    }
                    Self::Quest(id.to_string())
                } else {
                    return None;
                }
            }
        };
        Some(callback)
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile => f.write_str("profile"),
            Self::Top => f.write_str("top"),
            Self::Quests => f.write_str("quests"),
            Self::Rules => f.write_str("rules"),
            Self::MainMenu => f.write_str("main_menu"),
            Self::Moderation => f.write_str("moderation"),
            Self::JoinCommunity => f.write_str("join_community"),
            Self::React { kind, target } => write!(f, "react_{kind}_{target}"),
            Self::Quest(id) => write!(f, "quest_{id}"),
            Self::Mute { duration_secs } => match *duration_secs {
                MUTE_5MIN_SECS => f.write_str("mute_5min"),
                MUTE_30MIN_SECS => f.write_str("mute_30min"),
                _ => f.write_str("mute_7days"),
            },
            Self::Warn => f.write_str("warn"),
            Self::Ban => f.write_str("ban"),
            Self::Amnesty => f.write_str("amnesty"),
            Self::HelpAdmin => f.write_str("help_admin"),
            Self::ModStats => f.write_str("mod_stats"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaction_kind_may_contain_underscores() {
        assert_eq!(
            Callback::parse("react_thumbs_up_123"),
            Some(Callback::React {
                kind: "thumbs_up".to_string(),
                target: UserId::new(123)
            })
        );
        assert_eq!(
            Callback::parse("react_heart_-5"),
            Some(Callback::React {
                kind: "heart".to_string(),
                target: UserId::new(-5)
            })
        );
    }

    #[test]
    fn test_malformed_payloads() {
        for data in ["react_heart", "react__1", "react_heart_abc", "quest_", "nope", ""] {
            assert_eq!(Callback::parse(data), None, "{data}");
        }
    }

    #[test]
    fn test_menu_actions() {
        assert_eq!(
            Callback::parse("mute_30min"),
            Some(Callback::Mute {
                duration_secs: 1800
            })
        );
        assert_eq!(Callback::parse("quest_appraiser"), Some(Callback::Quest("appraiser".to_string())));
        assert_eq!(Callback::parse("mod_stats"), Some(Callback::ModStats));
    }

    #[test]
    fn test_display_is_parseable() {
        let react = Callback::React {
            kind: "thumbs_up".to_string(),
            target: UserId::new(9),
        };
        assert_eq!(react.to_string(), "react_thumbs_up_9");
        assert_eq!(Callback::parse(&react.to_string()), Some(react));
    }
}
