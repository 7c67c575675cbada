//! End-to-end community scenarios
//!
//! Each test runs the services against a fresh in-memory SQLite database,
//! a manual clock and a recording chat platform.
//!
//! Run with: cargo test -p integration-tests --test community_tests

use integration_tests::{identity, unique_user_id, PlatformCall, TestBot, CHAT};
use rankbot_core::ModerationAction;
use rankbot_service::dto::{
    ModerationDenied, ModerationOutcome, QuestOutcome, QuestRejected, ReactionDenied,
    ReactionOutcome,
};
use rankbot_service::{
    ExperienceService, MaintenanceService, ModerationService, ProfileService, QuestService,
};

// ============================================================================
// Experience
// ============================================================================

#[tokio::test]
async fn test_fifty_messages_reach_rank_two() {
    let bot = TestBot::start().await.unwrap();
    let ann = identity("Ann");
    let experience = ExperienceService::new(bot.ctx());

    for n in 1..50 {
        let activity = experience.record_message(&ann).await.unwrap();
        assert_eq!(activity.messages_count, n);
        assert!(activity.rank_change.is_none(), "promoted early at message {n}");
    }

    let activity = experience.record_message(&ann).await.unwrap();
    let change = activity.rank_change.expect("50th message promotes");
    assert_eq!((change.from, change.to), (1, 2));
    assert_eq!(activity.xp, 50);

    let view = ProfileService::new(bot.ctx()).profile(ann.id).await.unwrap();
    assert_eq!(view.member.rank, 2);
    assert_eq!(view.member.first_name, "Ann");
    assert_eq!(view.tier.name, "Newbie");
}

#[tokio::test]
async fn test_top_orders_by_xp() {
    let bot = TestBot::start().await.unwrap();
    let (low, high) = (unique_user_id(), unique_user_id());
    bot.seed(low, 10, 1).await.unwrap();
    bot.seed(high, 400, 4).await.unwrap();

    let top = ProfileService::new(bot.ctx()).top(10).await.unwrap();
    let ids: Vec<_> = top.iter().map(|m| m.id).collect();
    assert_eq!(ids, [high, low]);
}

// ============================================================================
// Reactions
// ============================================================================

#[tokio::test]
async fn test_rank_denial_wins_over_limits() {
    let bot = TestBot::start().await.unwrap();
    let (actor, target) = (unique_user_id(), unique_user_id());
    bot.seed(actor, 0, 1).await.unwrap();

    let outcome = ExperienceService::new(bot.ctx())
        .give_reaction(actor, target, "nerd")
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        ReactionOutcome::Denied(ReactionDenied::RankTooLow { required: 7 })
    ));
    assert_eq!(bot.load(actor).await.unwrap().reaction("nerd").given, 0);
}

#[tokio::test]
async fn test_heart_daily_limit_and_reset() {
    let bot = TestBot::start().await.unwrap();
    let (actor, target) = (unique_user_id(), unique_user_id());
    let experience = ExperienceService::new(bot.ctx());

    for _ in 0..10 {
        let outcome = experience.give_reaction(actor, target, "heart").await.unwrap();
        assert!(matches!(outcome, ReactionOutcome::Given(_)));
        bot.advance_secs(61);
    }

    let outcome = experience.give_reaction(actor, target, "heart").await.unwrap();
    assert!(matches!(
        outcome,
        ReactionOutcome::Denied(ReactionDenied::DailyLimitReached { limit: 10 })
    ));
    assert_eq!(bot.load(target).await.unwrap().xp, 10);

    MaintenanceService::new(bot.ctx()).reset_daily_counters().await.unwrap();

    let outcome = experience.give_reaction(actor, target, "heart").await.unwrap();
    assert!(matches!(outcome, ReactionOutcome::Given(_)));
    let giver = bot.load(actor).await.unwrap().reaction("heart");
    assert_eq!((giver.given, giver.given_today), (11, 1));
}

#[tokio::test]
async fn test_self_reaction_is_denied() {
    let bot = TestBot::start().await.unwrap();
    let ann = unique_user_id();

    let outcome = ExperienceService::new(bot.ctx())
        .give_reaction(ann, ann, "heart")
        .await
        .unwrap();

    assert!(matches!(outcome, ReactionOutcome::Denied(ReactionDenied::SelfReaction)));
}

// ============================================================================
// Quests
// ============================================================================

#[tokio::test]
async fn test_quest_completion_is_idempotent() {
    let bot = TestBot::start().await.unwrap();
    let (ann, bob) = (unique_user_id(), unique_user_id());
    let experience = ExperienceService::new(bot.ctx());
    let quests = QuestService::new(bot.ctx());

    let early = quests.complete_quest(ann, "appraiser").await.unwrap();
    assert_eq!(
        early,
        QuestOutcome::Rejected {
            reason: QuestRejected::NotMet
        }
    );

    for _ in 0..3 {
        experience.give_reaction(ann, bob, "heart").await.unwrap();
        bot.advance_secs(61);
    }
    assert!(quests.check_completion(ann, "appraiser").await.unwrap());
    let before = bot.load(ann).await.unwrap().xp;

    let first = quests.complete_quest(ann, "appraiser").await.unwrap();
    assert!(matches!(first, QuestOutcome::Completed { reward_xp: 50, .. }));

    let second = quests.complete_quest(ann, "appraiser").await.unwrap();
    assert_eq!(
        second,
        QuestOutcome::Rejected {
            reason: QuestRejected::AlreadyCompleted
        }
    );

    let member = bot.load(ann).await.unwrap();
    assert_eq!(member.xp, before + 50);
    assert_eq!(
        member.quests_completed.iter().filter(|q| q.as_str() == "appraiser").count(),
        1
    );
    assert!(!quests.available_quests(ann).await.unwrap().contains(&"appraiser".to_string()));
}

#[tokio::test]
async fn test_unknown_quest_is_a_user_error() {
    let bot = TestBot::start().await.unwrap();
    let err = QuestService::new(bot.ctx())
        .complete_quest(unique_user_id(), "dragon_slayer")
        .await
        .unwrap_err();
    assert!(err.is_user_error());
}

// ============================================================================
// Moderation
// ============================================================================

#[tokio::test]
async fn test_third_warn_bans_once() {
    let bot = TestBot::start().await.unwrap();
    let (first_mod, second_mod, target) = (unique_user_id(), unique_user_id(), unique_user_id());
    bot.seed(first_mod, 500, 4).await.unwrap();
    bot.seed(second_mod, 500, 4).await.unwrap();
    let moderation = ModerationService::new(bot.ctx());

    // Two warns per moderator stay within the daily cap
    let mut outcomes = Vec::new();
    for moderator in [first_mod, first_mod, second_mod, second_mod] {
        outcomes.push(moderation.warn(moderator, target, CHAT, "flood").await.unwrap());
    }

    let receipts: Vec<_> = outcomes.iter().map(|o| o.receipt().expect("warn applied")).collect();
    assert_eq!(
        receipts.iter().map(|r| r.target_warns).collect::<Vec<_>>(),
        [1, 2, 3, 4]
    );
    assert!(receipts[0].auto_ban.is_none());
    assert!(receipts[3].auto_ban.is_none());

    let ban = receipts[2].auto_ban.as_deref().and_then(ModerationOutcome::receipt).expect("auto-ban applied");
    assert_eq!(ban.action, ModerationAction::Ban);
    assert_eq!(ban.until, Some(bot.ctx().now() + chrono::Duration::seconds(86_400)));
    assert_eq!(bot.platform.bans(), 1);

    let history = ProfileService::new(bot.ctx()).moderation_history(target, 20).await.unwrap();
    assert_eq!(history.len(), 5);
    let stored = bot.load(target).await.unwrap();
    assert_eq!(stored.moderation.warns, 4);
    assert_eq!(stored.moderation.bans, 1);
}

#[tokio::test]
async fn test_daily_warn_cap_applies_per_moderator() {
    let bot = TestBot::start().await.unwrap();
    let moderator = unique_user_id();
    bot.seed(moderator, 500, 4).await.unwrap();
    let moderation = ModerationService::new(bot.ctx());

    for _ in 0..2 {
        let outcome = moderation.warn(moderator, unique_user_id(), CHAT, "").await.unwrap();
        assert!(outcome.is_applied());
    }
    let outcome = moderation.warn(moderator, unique_user_id(), CHAT, "").await.unwrap();
    assert_eq!(
        outcome,
        ModerationOutcome::Denied(ModerationDenied::DailyWarnLimit { limit: 2 })
    );

    let stats = moderation.moderator_stats(moderator).await.unwrap();
    assert_eq!((stats.warns, stats.warns_left), (2, Some(0)));
}

#[tokio::test]
async fn test_sixth_sticker_is_spam() {
    let bot = TestBot::start().await.unwrap();
    let spammer = unique_user_id();
    let moderation = ModerationService::new(bot.ctx());

    for n in 1..=5 {
        let check = moderation.sticker_spam_check(spammer, CHAT).await.unwrap();
        assert_eq!(check.count, n);
        assert!(!check.spam);
        bot.advance_secs(5);
    }

    let check = moderation.sticker_spam_check(spammer, CHAT).await.unwrap();
    assert!(check.spam);
    let warn = check.warn.expect("spam warns");
    assert_eq!(warn.receipt().map(|r| r.moderator), Some(bot.ctx().bot_id()));
    assert_eq!(bot.load(spammer).await.unwrap().moderation.warns, 1);

    // Window has fully rolled over
    bot.advance_secs(61);
    let check = moderation.sticker_spam_check(spammer, CHAT).await.unwrap();
    assert_eq!(check.count, 1);
    assert!(!check.spam);
}

#[tokio::test]
async fn test_platform_refusal_is_a_failure_outcome() {
    let bot = TestBot::start().await.unwrap();
    let (moderator, target) = (unique_user_id(), unique_user_id());
    bot.seed(moderator, 2300, 9).await.unwrap();
    bot.platform.refuse("Bad Request: not enough rights");

    let outcome = ModerationService::new(bot.ctx())
        .ban(moderator, target, CHAT, 3600, "raid")
        .await
        .unwrap();

    assert!(matches!(outcome, ModerationOutcome::Failed { ref reason } if reason.contains("not enough rights")));
    assert_eq!(bot.load(target).await.unwrap().moderation.bans, 0);
}

#[tokio::test]
async fn test_amnesty_clears_and_lifts() {
    let bot = TestBot::start().await.unwrap();
    let (moderator, target) = (unique_user_id(), unique_user_id());
    bot.seed(moderator, 2300, 9).await.unwrap();
    let moderation = ModerationService::new(bot.ctx());

    moderation.mute(moderator, target, CHAT, 600, "spam").await.unwrap();
    let outcome = moderation.amnesty(moderator, target, CHAT).await.unwrap();
    assert!(outcome.is_applied());

    let stored = bot.load(target).await.unwrap();
    assert_eq!(stored.moderation.warns, 0);
    assert!(stored.moderation.muted_until.is_none());
    assert_eq!(bot.platform.calls().last(), Some(&PlatformCall::Lift { user: target }));
}
