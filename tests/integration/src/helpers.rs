//! Test helpers for integration tests
//!
//! `TestBot` builds the full service stack over an in-memory database.
//! `TestServer` serves the health endpoint on an ephemeral local port.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use rankbot_core::{GameRules, ManualClock, Member, MemberRepository, UserId};
use rankbot_db::{connect, DatabaseConfig, SqliteMemberRepository, SqliteModerationLogRepository};
use rankbot_gateway::server::{create_app, HealthState};
use rankbot_service::ServiceContext;
use rankbot_service::ServiceContextBuilder;
use reqwest::Client;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{RecordingPlatform, BOT};

/// Services over a fresh in-memory database
pub struct TestBot {
    pub ctx: Arc<ServiceContext>,
    pub clock: Arc<ManualClock>,
    pub platform: Arc<RecordingPlatform>,
    members: Arc<SqliteMemberRepository>,
}

impl TestBot {
    pub async fn start() -> Result<Self> {
        Self::with_rules(GameRules::default()).await
    }

    pub async fn with_rules(rules: GameRules) -> Result<Self> {
        let pool = connect(&DatabaseConfig::in_memory()).await?;
        let members = Arc::new(SqliteMemberRepository::new(pool.clone()));
        let logs = Arc::new(SqliteModerationLogRepository::new(pool));
        // Midday, far from the local-midnight boundary
        let start = Utc
            .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .single()
            .context("invalid start time")?;
        let clock = Arc::new(ManualClock::new(start));
        let platform = Arc::new(RecordingPlatform::default());

        let ctx = ServiceContextBuilder::new()
            .member_repo(members.clone())
            .moderation_log_repo(logs)
            .platform(platform.clone())
            .clock(clock.clone())
            .rules(Arc::new(rules))
            .bot_id(BOT)
            .build()?;

        Ok(Self {
            ctx: Arc::new(ctx),
            clock,
            platform,
            members,
        })
    }

    pub fn ctx(&self) -> &ServiceContext {
        &self.ctx
    }

    /// Move the clock forward
    pub fn advance_secs(&self, secs: i64) {
        self.clock.advance(chrono::Duration::seconds(secs));
    }

    /// Store a member at the given XP and rank
    pub async fn seed(&self, id: UserId, xp: u64, rank: u8) -> Result<Member> {
        let mut member = Member::new(id, self.ctx.now());
        member.xp = xp;
        member.rank = rank;
        self.members.save(&member).await?;
        Ok(member)
    }

    pub async fn load(&self, id: UserId) -> Result<Member> {
        self.members
            .find_by_id(id)
            .await?
            .with_context(|| format!("member {id} not stored"))
    }
}

/// Health server bound to an ephemeral local port
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start(ctx: Arc<ServiceContext>) -> Result<Self> {
        let app = create_app(HealthState::new(ctx));
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            _handle: handle,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn get_text(&self, path: &str) -> Result<(u16, String)> {
        let response = self.client.get(self.url(path)).send().await?;
        let status = response.status().as_u16();
        Ok((status, response.text().await?))
    }

    pub async fn get_json(&self, path: &str) -> Result<(u16, serde_json::Value)> {
        let response = self.client.get(self.url(path)).send().await?;
        let status = response.status().as_u16();
        Ok((status, response.json().await?))
    }
}
