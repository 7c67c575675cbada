//! Health server tests over a real local socket
//!
//! Run with: cargo test -p integration-tests --test health_tests

use integration_tests::{identity, TestBot, TestServer, CHAT};
use rankbot_service::{ExperienceService, ModerationService};

#[tokio::test]
async fn test_health_check() {
    let bot = TestBot::start().await.unwrap();
    let server = TestServer::start(bot.ctx.clone()).await.unwrap();

    let (status, body) = server.get_text("/health").await.unwrap();
    assert_eq!(status, 200);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_stats_count_members_and_logs() {
    let bot = TestBot::start().await.unwrap();
    let server = TestServer::start(bot.ctx.clone()).await.unwrap();

    let ann = identity("Ann");
    ExperienceService::new(bot.ctx()).record_message(&ann).await.unwrap();
    ModerationService::new(bot.ctx())
        .sticker_spam_check(ann.id, CHAT)
        .await
        .unwrap();

    let (status, json) = server.get_json("/stats").await.unwrap();
    assert_eq!(status, 200);
    assert_eq!(json["members"], 1);
    assert_eq!(json["moderation_logs"], 0);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let bot = TestBot::start().await.unwrap();
    let server = TestServer::start(bot.ctx.clone()).await.unwrap();

    let (status, _) = server.get_text("/metrics").await.unwrap();
    assert_eq!(status, 404);
}
