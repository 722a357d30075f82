//! HTTP transport for the snapshot
//!
//! Failures are logged in full but answered with a fixed body, so internal
//! error detail never reaches clients.

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::service::SnapshotProvider;

/// Body returned when a snapshot cannot be produced
pub const SNAPSHOT_FAILED_BODY: &str = "sorry something went wrong";

/// Body returned when a snapshot cannot be serialized
pub const SERIALIZE_FAILED_BODY: &str = "failed to serialize json";

/// Shared handler state
pub type ApiState = Arc<dyn SnapshotProvider>;

/// Build the API router
pub fn router(provider: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v3/courses", get(get_courses))
        .layer(CorsLayer::permissive())
        .with_state(provider)
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve(addr: &str, provider: ApiState) -> Result<()> {
    let app = router(provider);

    info!("Starting catalog API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "ok"
}

async fn get_courses(State(provider): State<ApiState>) -> Response {
    let snapshot = match provider.produce_snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Failed to produce snapshot: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, SNAPSHOT_FAILED_BODY).into_response();
        }
    };

    match serde_json::to_string(&snapshot) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to serialize snapshot: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, SERIALIZE_FAILED_BODY).into_response()
        }
    }
}
