//! HTTP adapter: routes requests onto the matchmaker.
//!
//! Each handler is a thin translation. It pulls the id out of the request,
//! calls one [`Matchmaker`] operation, and serializes the result. No
//! decision logic lives here.
//!
//! ```text
//! GET       /join?id=…      → JoinResponse       (400, 409)
//! GET       /status/{*id}   → PollResponse       (400, 404)
//! GET|POST  /cancel?id=…    → CancelResponse
//! GET       /stats          → Snapshot
//! GET       /health         → "OK"
//! ```

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use matchforge_protocol::{CancelResponse, JoinResponse, PollResponse, ProtocolError, Snapshot};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::{ErrorKind, Matchmaker, MatchforgeError};

/// `?id=` query parameter. A missing parameter reads as the empty string
/// so that it is rejected the same way an explicit `?id=` is.
#[derive(Debug, Deserialize)]
struct IdQuery {
    #[serde(default)]
    id: String,
}

/// Builds the router over a shared matchmaker.
pub fn router(matchmaker: Arc<Matchmaker>) -> Router {
    Router::new()
        .route("/join", get(join))
        .route("/cancel", get(cancel).post(cancel))
        .route("/status/", get(status_without_id))
        .route("/status/{*id}", get(status))
        .route("/stats", get(stats))
        .route("/health", get(|| async { "OK" }))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(matchmaker)
}

async fn join(
    State(matchmaker): State<Arc<Matchmaker>>,
    Query(query): Query<IdQuery>,
) -> Result<Json<JoinResponse>, MatchforgeError> {
    matchmaker.join(&query.id).await.map(Json)
}

async fn cancel(
    State(matchmaker): State<Arc<Matchmaker>>,
    Query(query): Query<IdQuery>,
) -> Json<CancelResponse> {
    Json(matchmaker.cancel(&query.id).await)
}

async fn status(
    State(matchmaker): State<Arc<Matchmaker>>,
    Path(id): Path<String>,
) -> Result<Json<PollResponse>, MatchforgeError> {
    matchmaker.poll(&id).await.map(Json)
}

async fn status_without_id() -> MatchforgeError {
    ProtocolError::EmptyPlayerId.into()
}

async fn stats(State(matchmaker): State<Arc<Matchmaker>>) -> Json<Snapshot> {
    Json(matchmaker.snapshot().await)
}

impl IntoResponse for MatchforgeError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::AlreadyExists => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
