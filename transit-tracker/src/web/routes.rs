//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::topology::StopMeta;
use crate::tracking::{TrackerStatus, TrackingError};

use super::dto::*;
use super::socket;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search", get(search_stop))
        .route("/status", get(status))
        .route("/ws", get(socket::upgrade))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Look up a stop by id.
async fn search_stop(
    State(state): State<AppState>,
    query: Result<Query<StopSearchRequest>, QueryRejection>,
) -> Result<Json<StopMeta>, AppError> {
    let Query(req) = query?;
    state
        .topology
        .stop(&req.stop_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound {
            message: format!("Unknown stop: {}", req.stop_id),
        })
}

/// Poll loop counters.
async fn status(State(state): State<AppState>) -> Result<Json<TrackerStatus>, AppError> {
    Ok(Json(state.tracker.status().await?))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<TrackingError> for AppError {
    fn from(e: TrackingError) -> Self {
        match e {
            TrackingError::TrackerStopped => AppError::Internal {
                message: e.to_string(),
            },
            _ => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            warn!(%status, %message, "request failed");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
