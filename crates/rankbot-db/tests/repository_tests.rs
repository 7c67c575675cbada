//! Repository tests for rankbot-db
//!
//! Each test runs against its own in-memory SQLite database.

use chrono::{Duration, Utc};

use rankbot_core::entities::{Member, ModerationAction, NewModerationLog};
use rankbot_core::traits::{MemberRepository, ModerationLogRepository};
use rankbot_core::value_objects::UserId;
use rankbot_db::{connect, DatabaseConfig, SqliteMemberRepository, SqliteModerationLogRepository};

async fn repos() -> (SqliteMemberRepository, SqliteModerationLogRepository) {
    let pool = connect(&DatabaseConfig::in_memory())
        .await
        .expect("in-memory database");
    (
        SqliteMemberRepository::new(pool.clone()),
        SqliteModerationLogRepository::new(pool),
    )
}

fn sample_member(id: i64) -> Member {
    let mut member = Member::new(UserId::new(id), Utc::now());
    member.set_identity(&format!("user{id}"), "Test", "User");
    member
}

#[tokio::test]
async fn test_find_missing_member() {
    let (members, _) = repos().await;
    assert!(members.find_by_id(UserId::new(1)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_save_and_load_full_record() {
    let (members, _) = repos().await;
    let now = Utc::now();

    let mut member = sample_member(10);
    member.xp = 320;
    member.rank = 4;
    member.messages_count = 77;
    member.daily_messages = 12;
    member.moderation.warns = 2;
    member.moderation.last_warn_at = Some(now);
    member.moderation.muted_until = Some(now + Duration::minutes(5));
    {
        let heart = member.reaction_mut("heart");
        heart.given = 4;
        heart.given_today = 2;
        heart.last_given_at = Some(now);
    }
    member.reaction_mut("nerd").received = 3;
    member.mark_quest_completed("appraiser");

    members.save(&member).await.unwrap();
    let loaded = members.find_by_id(member.id).await.unwrap().unwrap();

    assert_eq!(loaded.username, "user10");
    assert_eq!(loaded.xp, 320);
    assert_eq!(loaded.rank, 4);
    assert_eq!(loaded.messages_count, 77);
    assert_eq!(loaded.daily_messages, 12);
    assert_eq!(loaded.moderation.warns, 2);
    assert!(loaded.moderation.muted_until.is_some());
    assert_eq!(loaded.reaction("heart").given, 4);
    assert_eq!(loaded.reaction("heart").given_today, 2);
    assert!(loaded.reaction("heart").last_given_at.is_some());
    assert_eq!(loaded.reaction("nerd").received, 3);
    assert_eq!(loaded.quests_completed, vec!["appraiser".to_string()]);
}

#[tokio::test]
async fn test_save_updates_existing_record() {
    let (members, _) = repos().await;

    let mut member = sample_member(11);
    members.save(&member).await.unwrap();

    member.xp = 55;
    member.reaction_mut("heart").given = 1;
    member.mark_quest_completed("appraiser");
    members.save(&member).await.unwrap();

    member.reaction_mut("heart").given = 2;
    members.save(&member).await.unwrap();

    let loaded = members.find_by_id(member.id).await.unwrap().unwrap();
    assert_eq!(loaded.xp, 55);
    assert_eq!(loaded.reaction("heart").given, 2);
    assert_eq!(loaded.quests_completed.len(), 1);
    assert_eq!(members.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_top_by_xp_orders_descending() {
    let (members, _) = repos().await;

    for (id, xp) in [(1, 10), (2, 500), (3, 120), (4, 500)] {
        let mut member = sample_member(id);
        member.xp = xp;
        members.save(&member).await.unwrap();
    }

    let top = members.top_by_xp(3).await.unwrap();
    let ids: Vec<i64> = top.iter().map(|m| m.id.into_inner()).collect();
    assert_eq!(ids, vec![2, 4, 3]);
}

#[tokio::test]
async fn test_reset_daily_counters() {
    let (members, _) = repos().await;

    let mut member = sample_member(20);
    member.daily_messages = 9;
    member.reaction_mut("heart").given_today = 5;
    member.reaction_mut("heart").given = 8;
    members.save(&member).await.unwrap();
    members.save(&sample_member(21)).await.unwrap();

    let touched = members.reset_daily_counters().await.unwrap();
    assert_eq!(touched, 2);

    let loaded = members.find_by_id(member.id).await.unwrap().unwrap();
    assert_eq!(loaded.daily_messages, 0);
    assert_eq!(loaded.reaction("heart").given_today, 0);
    assert_eq!(loaded.reaction("heart").given, 8);
}

#[tokio::test]
async fn test_moderation_log_ids_are_sequential() {
    let (_, logs) = repos().await;
    let now = Utc::now();

    let first = logs
        .append(NewModerationLog::new(
            ModerationAction::Warn,
            UserId::new(1),
            UserId::new(2),
            "spam",
            now,
        ))
        .await
        .unwrap();
    let second = logs
        .append(NewModerationLog::new(
            ModerationAction::Mute,
            UserId::new(1),
            UserId::new(2),
            "",
            now,
        ))
        .await
        .unwrap();

    assert!(second.id > first.id);
    assert_eq!(logs.count().await.unwrap(), 2);

    let history = logs.find_by_target(UserId::new(2), 10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, second.id);
    assert_eq!(history[0].action, ModerationAction::Mute);
    assert_eq!(history[1].reason, "spam");
}

#[tokio::test]
async fn test_count_by_moderator_since() {
    let (_, logs) = repos().await;
    let now = Utc::now();
    let moderator = UserId::new(7);

    let entries = [
        (ModerationAction::Warn, moderator, now - Duration::days(1)),
        (ModerationAction::Warn, moderator, now - Duration::minutes(5)),
        (ModerationAction::Warn, moderator, now),
        (ModerationAction::Mute, moderator, now),
        (ModerationAction::Warn, UserId::new(8), now),
    ];
    for (action, issued_by, at) in entries {
        logs.append(NewModerationLog::new(action, issued_by, UserId::new(99), "", at))
            .await
            .unwrap();
    }

    let since = now - Duration::hours(1);
    let warns = logs
        .count_by_moderator_since(moderator, ModerationAction::Warn, since)
        .await
        .unwrap();
    assert_eq!(warns, 2);

    let mutes = logs
        .count_by_moderator_since(moderator, ModerationAction::Mute, since)
        .await
        .unwrap();
    assert_eq!(mutes, 1);
}
