//! Health server
//!
//! Optional HTTP listener for liveness probes and community counters.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rankbot_common::{AppError, ErrorResponse};
use rankbot_service::dto::CommunityStats;
use rankbot_service::{MaintenanceService, ServiceContext};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Health server state
#[derive(Clone)]
pub struct HealthState {
    service_context: Arc<ServiceContext>,
}

impl HealthState {
    pub fn new(service_context: Arc<ServiceContext>) -> Self {
        Self { service_context }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }
}

/// `AppError` rendered as a JSON error body
#[derive(Debug)]
pub struct ApiError(AppError);

impl<E: Into<AppError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_server_error() {
            error!(error = ?self.0, "Server error occurred");
        }

        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

pub fn create_router() -> Router<HealthState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(stats))
}

async fn health_check() -> &'static str {
    "OK"
}

async fn stats(State(state): State<HealthState>) -> Result<Json<CommunityStats>, ApiError> {
    let stats = MaintenanceService::new(state.service_context()).stats().await?;
    Ok(Json(stats))
}

/// Build the complete application
pub fn create_app(state: HealthState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the health server until the listener fails
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to bind to {addr}: {e}")))?;

    info!("Health server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Server error: {e}")))?;

    Ok(())
}
