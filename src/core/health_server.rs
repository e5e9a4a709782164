//! HTTP liveness endpoint for process supervisors.
//!
//! Runs on HEALTH_PORT (default 8080) next to the update listener.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::storage::db::DbPool;
use crate::storage::{count_profiles, count_sessions, get_connection, ProfileFilter};

#[derive(Clone)]
struct HealthState {
    db: Arc<DbPool>,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: String,
    pub total_users: u64,
    pub active_sessions: u64,
}

/// Start the health server. Returns only when the listener fails.
pub async fn start_health_server(port: u16, db: Arc<DbPool>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .with_state(HealthState { db });

    log::info!("Starting health server on http://{}", addr);
    log::info!("  /        - Liveness text");
    log::info!("  /health  - Liveness JSON");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn root_handler() -> &'static str {
    "Bot is running"
}

async fn health_handler(State(state): State<HealthState>) -> impl IntoResponse {
    (StatusCode::OK, Json(health_status(&state.db)))
}

/// Builds the health snapshot. Storage trouble degrades the counters to zero
/// instead of failing the probe.
pub fn health_status(db: &DbPool) -> HealthStatus {
    let (total_users, active_sessions) = match get_connection(db) {
        Ok(conn) => (
            count_profiles(&conn, ProfileFilter::All).unwrap_or_else(|e| {
                log::warn!("Health check could not count users: {}", e);
                0
            }),
            count_sessions(&conn).unwrap_or_else(|e| {
                log::warn!("Health check could not count sessions: {}", e);
                0
            }),
        ),
        Err(e) => {
            log::warn!("Health check could not get a connection: {}", e);
            (0, 0)
        }
    };

    HealthStatus {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
        total_users,
        active_sessions,
    }
}
