//! HTML message bodies

use std::fmt::Write as _;

use rankbot_core::{GameRules, Member, ModerationAction, RankTable, RankTier};
use rankbot_service::dto::{
    ModerationOutcome, ModeratorStats, ProfileView, QuestBoard, QuestOutcome, ReactionReceipt,
};

use super::text::{escape_html, format_duration, progress_bar};
use crate::telegram::{Chat, User};

pub fn welcome(user: &User) -> String {
    format!(
        "👋 Hi, {}!\n\n\
         I keep track of activity in this community: messages and reactions earn XP, \
         XP earns ranks, ranks unlock quests and moderation tools.\n\n\
         ✨ <b>Commands:</b>\n\
         /profile - your profile\n\
         /top - top players\n\
         /quests - your quests\n\
         /rules - community rules\n\
         /help - help\n\n\
         🆔 <b>Your ID:</b> <code>{}</code>",
        escape_html(&user.first_name),
        user.id
    )
}

pub fn new_member(user: &User) -> String {
    format!(
        "🎉 Welcome, {}! Press the button below to join the community.",
        escape_html(&user.first_name)
    )
}

pub fn help(ranks: &RankTable) -> String {
    let mut text = String::from(
        "🆘 <b>HELP</b>\n\n\
         <b>Commands:</b>\n\
         /start - start\n\
         /profile - your profile\n\
         /id - show IDs\n\
         /top - top players\n\
         /quests - your quests\n\
         /rules - community rules\n\n\
         <b>For moderators</b> (reply to the member's message):\n\
         /warn [reason] - warn\n\
         /mute &lt;duration&gt; [reason] - mute, e.g. /mute 10m\n\
         /ban &lt;duration&gt; [reason] - ban, e.g. /ban 1d\n\
         /amnesty - clear warns and restrictions\n\
         /helpadmin [text] - call the developer\n\n",
    );
    text.push_str(&rank_ladder(ranks));
    text
}

pub fn rules(rules: &GameRules) -> String {
    format!(
        "📜 <b>COMMUNITY RULES</b>\n\n\
         1. Respect each other\n\
         2. No spam\n\
         3. Don't break the law\n\
         4. Follow the moderators\n\
         5. Help newcomers\n\n\
         Violations are punished with:\n\
         1. A warning ⚠️\n\
         2. A mute 🔇\n\
         3. A ban 🚫\n\n\
         {} warnings mean an automatic {} ban.",
        rules.moderation.warns_before_ban,
        format_duration(rules.moderation.auto_ban_duration_secs)
    )
}

pub fn id_info(user: &User, chat: &Chat) -> String {
    format!(
        "🆔 <b>ID INFO</b>\n\n\
         <b>Your ID:</b> <code>{}</code>\n\
         <b>Username:</b> {}\n\
         <b>Name:</b> {}\n\n\
         <b>Chat ID:</b> <code>{}</code>\n\
         <b>Chat type:</b> {}",
        user.id,
        user.username
            .as_deref()
            .map_or_else(|| "not set".to_string(), |u| format!("@{}", escape_html(u))),
        escape_html(&user.first_name),
        chat.id,
        escape_html(&chat.kind)
    )
}

pub fn rank_ladder(ranks: &RankTable) -> String {
    let mut text = String::from("<b>Ranks:</b>\n");
    for tier in ranks.tiers() {
        let _ = writeln!(
            text,
            "{}. {} {} ({} XP)",
            tier.level,
            escape_html(&tier.name),
            tier.emoji,
            tier.xp_required
        );
    }
    text
}

pub fn profile_card(view: &ProfileView, rules: &GameRules) -> String {
    let member = &view.member;
    let mut text = format!(
        "{} <b>{}</b>\n",
        view.tier.symbols,
        escape_html(&member.display_name())
    );
    if !member.username.is_empty() {
        let _ = writeln!(text, "@{}", escape_html(&member.username));
    }

    let _ = write!(
        text,
        "\n<b>Rank:</b> {}\n<b>XP:</b> {}\n",
        escape_html(&view.tier.title()),
        member.xp
    );
    match &view.next_tier {
        Some(next) if !view.progress.is_max() => {
            let _ = writeln!(
                text,
                "<b>Progress:</b> {} {:.1}% to {} ({} XP left)",
                progress_bar(view.progress.percent),
                view.progress.percent,
                escape_html(&next.name),
                view.progress.xp_to_next
            );
        }
        _ => text.push_str("<b>Progress:</b> top rank reached\n"),
    }

    let _ = write!(
        text,
        "\n<b>Messages:</b> {} ({} today)\n<b>Reactions received:</b>",
        member.messages_count, member.daily_messages
    );
    for rule in rules.reactions.iter() {
        let _ = write!(text, " {}{}", rule.emoji, member.reaction(&rule.kind).received);
    }

    let _ = write!(
        text,
        "\n<b>Quests completed:</b> {}\n<b>Warnings:</b> {}/{}\n\n<b>Member since:</b> {}",
        member.quests_completed.len(),
        member.moderation.warns,
        rules.moderation.warns_before_ban,
        member.joined_at.format("%Y-%m-%d")
    );
    text
}

pub fn top_list(members: &[Member], ranks: &RankTable) -> String {
    if members.is_empty() {
        return "No statistics yet".to_string();
    }

    let mut text = String::from("🏆 <b>TOP-10 PLAYERS</b>\n\n");
    for (place, member) in members.iter().take(10).enumerate() {
        let symbols = ranks.tier(member.rank).map_or("", |t| t.symbols.as_str());
        let _ = writeln!(
            text,
            "{}. {} <b>{}</b>\n   ⭐ {} XP | 📨 {} messages\n",
            place + 1,
            symbols,
            escape_html(&member.display_name()),
            member.xp,
            member.messages_count
        );
    }
    text
}

pub fn quest_board(board: &QuestBoard) -> String {
    let mut text = format!(
        "🎯 <b>QUESTS</b>\n\nEach quest pays <b>{} XP</b> once.\n\n",
        board.reward_xp
    );
    if board.available.is_empty() {
        text.push_str("No open quests at your rank.\n");
    }
    for quest in &board.available {
        let _ = writeln!(
            text,
            "• <b>{}</b> - {}",
            escape_html(&quest.title),
            escape_html(&quest.description)
        );
    }
    if !board.completed.is_empty() {
        let _ = write!(text, "\n✅ Completed: {}", board.completed.len());
    }
    text
}

pub fn quest_result(outcome: &QuestOutcome, ranks: &RankTable) -> String {
    match outcome {
        QuestOutcome::Completed {
            reward_xp,
            rank_change,
            ..
        } => {
            let mut text = format!("🎉 Quest completed! +{reward_xp} XP");
            if let Some(tier) = rank_change.and_then(|c| ranks.tier(c.to)) {
                let _ = write!(text, "\n{}", rank_up_line(tier));
            }
            text
        }
        QuestOutcome::Rejected { reason } => reason.to_string(),
    }
}

fn rank_up_line(tier: &RankTier) -> String {
    format!("⬆️ New rank: {}", escape_html(&tier.title()))
}

pub fn rank_up(name: &str, tier: &RankTier) -> String {
    format!(
        "🎊 <b>{}</b> reached a new rank!\n{}",
        escape_html(name),
        rank_up_line(tier)
    )
}

/// Short toast for the reacting member
pub fn reaction_given(receipt: &ReactionReceipt) -> String {
    format!(
        "{} +{} XP sent ({}/{} today)",
        receipt.emoji, receipt.xp, receipt.given_today, receipt.daily_limit
    )
}

/// Reply text for a moderation outcome
pub fn moderation_result(outcome: &ModerationOutcome, target_name: &str) -> String {
    let target = escape_html(target_name);
    match outcome {
        ModerationOutcome::Applied(receipt) => {
            let until = receipt
                .until
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_default();
            let mut text = match receipt.action {
                ModerationAction::Warn => format!("⚠️ {target} warned ({} so far)", receipt.target_warns),
                ModerationAction::Mute => format!("🔇 {target} muted until {until}"),
                ModerationAction::Ban => format!("🚫 {target} banned until {until}"),
                ModerationAction::Amnesty => format!("🔄 {target} pardoned: warnings cleared"),
            };
            if !receipt.reason.is_empty() && receipt.action != ModerationAction::Amnesty {
                let _ = write!(text, "\nReason: {}", escape_html(&receipt.reason));
            }
            if let Some(ban) = &receipt.auto_ban {
                let _ = write!(text, "\n{}", moderation_result(ban, target_name));
            }
            text
        }
        ModerationOutcome::Denied(reason) => format!("⛔ {reason}"),
        ModerationOutcome::Failed { reason } => {
            format!("❗ Telegram refused the action: {}", escape_html(reason))
        }
    }
}

pub fn moderator_stats(stats: &ModeratorStats) -> String {
    let mut text = format!(
        "📊 <b>Your actions today</b>\n\n⚠️ Warns: {}\n🔇 Mutes: {}\n🚫 Bans: {}",
        stats.warns, stats.mutes, stats.bans
    );
    if let Some(left) = stats.warns_left {
        let _ = write!(text, "\n\nWarns left today: {left}");
    }
    text
}

pub fn admin_notice(from: &User, chat: &Chat, text: &str) -> String {
    let mut notice = format!(
        "🆘 <b>Admin help requested</b>\n\n<b>From:</b> {} (<code>{}</code>)\n<b>Chat:</b> {} (<code>{}</code>)",
        escape_html(&from.first_name),
        from.id,
        escape_html(chat.title.as_deref().unwrap_or("private")),
        chat.id
    );
    if !text.is_empty() {
        let _ = write!(notice, "\n\n{}", escape_html(text));
    }
    notice
}
