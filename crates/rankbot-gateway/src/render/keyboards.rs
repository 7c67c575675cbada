//! Inline keyboards

use rankbot_core::{ModerationPolicy, ReactionTable, UserId};
use rankbot_service::dto::QuestBoard;

use crate::commands::{Callback, MUTE_30MIN_SECS, MUTE_5MIN_SECS, MUTE_7DAYS_SECS};
use crate::telegram::{InlineKeyboardButton, InlineKeyboardMarkup};

fn button(text: impl Into<String>, callback: &Callback) -> InlineKeyboardButton {
    InlineKeyboardButton::new(text, callback.to_string())
}

fn back_row() -> Vec<InlineKeyboardButton> {
    vec![button("↩️ Back", &Callback::MainMenu)]
}

pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button("👤 Profile", &Callback::Profile)],
        vec![button("🎯 Quests", &Callback::Quests)],
        vec![button("🏆 Top players", &Callback::Top)],
        vec![button("📜 Rules", &Callback::Rules)],
        vec![button("🛠️ Moderation", &Callback::Moderation)],
    ])
}

pub fn back_to_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![back_row()])
}

pub fn join_community() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button(
        "✅ Join the community",
        &Callback::JoinCommunity,
    )]])
}

/// Moderation actions unlocked at `rank`
pub fn moderation_menu(rank: u8, policy: &ModerationPolicy) -> InlineKeyboardMarkup {
    let mut rows = vec![vec![
        button(
            "🔇 Mute 5 min",
            &Callback::Mute {
                duration_secs: MUTE_5MIN_SECS,
            },
        ),
        button("🆘 Call an admin", &Callback::HelpAdmin),
    ]];

    if policy.can_warn(rank) {
        rows.push(vec![
            button("⚠️ Warn", &Callback::Warn),
            button(
                "🔇 Mute 30 min",
                &Callback::Mute {
                    duration_secs: MUTE_30MIN_SECS,
                },
            ),
        ]);
    }

    if rank >= policy.ban_min_rank {
        rows.push(vec![
            button("🚫 Ban", &Callback::Ban),
            button(
                "🔇 Mute 7 days",
                &Callback::Mute {
                    duration_secs: MUTE_7DAYS_SECS,
                },
            ),
        ]);
    }

    if policy.can_grant_amnesty(rank) {
        rows.push(vec![
            button("🔄 Amnesty", &Callback::Amnesty),
            button("📊 Stats", &Callback::ModStats),
        ]);
    }

    rows.push(back_row());
    InlineKeyboardMarkup::new(rows)
}

/// One button per reaction kind, aimed at `target`
pub fn reactions(target: UserId, table: &ReactionTable) -> InlineKeyboardMarkup {
    let row = table
        .iter()
        .map(|rule| {
            button(
                format!("{} +{} XP", rule.emoji, rule.xp),
                &Callback::React {
                    kind: rule.kind.clone(),
                    target,
                },
            )
        })
        .collect();
    InlineKeyboardMarkup::new(vec![row])
}

/// One claim button per open quest
pub fn quests(board: &QuestBoard) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = board
        .available
        .iter()
        .map(|quest| vec![button(format!("🎯 {}", quest.title), &Callback::Quest(quest.id.clone()))])
        .collect();
    rows.push(back_row());
    InlineKeyboardMarkup::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moderation_menu_grows_with_rank() {
        let policy = ModerationPolicy::default();

        let low: Vec<_> = moderation_menu(1, &policy).callbacks().map(str::to_string).collect();
        assert_eq!(low, vec!["mute_5min", "help_admin", "main_menu"]);

        let mid: Vec<_> = moderation_menu(5, &policy).callbacks().map(str::to_string).collect();
        assert!(mid.contains(&"warn".to_string()));
        assert!(!mid.contains(&"ban".to_string()));

        let high: Vec<_> = moderation_menu(8, &policy).callbacks().map(str::to_string).collect();
        for expected in ["ban", "mute_7days", "amnesty", "mod_stats"] {
            assert!(high.contains(&expected.to_string()), "{expected}");
        }
    }

    #[test]
    fn test_reaction_buttons_follow_table() {
        let keyboard = reactions(UserId::new(77), &ReactionTable::default());
        let data: Vec<_> = keyboard.callbacks().collect();
        assert_eq!(data, vec!["react_heart_77", "react_thumbs_up_77", "react_nerd_77"]);
        assert_eq!(keyboard.inline_keyboard[0][1].text, "👍 +5 XP");
    }
}
