use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
    Json, Router,
};
use chrono::Utc;

use stockmaster_core::SessionId;
use stockmaster_scanning::ScannerConfig;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/sessions", post(start_session).get(list_sessions))
        .route("/sessions/:id", delete(stop_session).get(get_session))
        .route("/sessions/:id/captures", post(record_capture))
}

fn parse_session_id(s: &str) -> Result<SessionId, axum::response::Response> {
    s.parse().map_err(|_| dto::invalid_id("invalid session id"))
}

pub async fn start_session(
    Extension(services): Extension<Arc<AppServices>>,
    Json(config): Json<ScannerConfig>,
) -> axum::response::Response {
    match services.sessions.start(&config) {
        Ok(session) => {
            tracing::info!(
                session_id = %session.id,
                camera_id = session.camera_id,
                "scanner session started"
            );
            (StatusCode::CREATED, Json(session)).into_response()
        }
        Err(e) => errors::session_error_to_response(e),
    }
}

pub async fn list_sessions(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    let sessions = services.sessions.list();
    Json(serde_json::json!({
        "count": sessions.len(),
        "sessions": sessions,
    }))
}

pub async fn get_session(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_session_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.sessions.get(id) {
        Some(session) => (StatusCode::OK, Json(session)).into_response(),
        None => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("scanner session {id} not found"),
        ),
    }
}

pub async fn stop_session(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_session_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.sessions.stop(id) {
        Ok(session) => {
            tracing::info!(
                session_id = %session.id,
                captures = session.captures,
                "scanner session stopped"
            );
            (StatusCode::OK, Json(session)).into_response()
        }
        Err(e) => errors::session_error_to_response(e),
    }
}

pub async fn record_capture(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::CaptureBody>,
) -> axum::response::Response {
    let id = match parse_session_id(&id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    let captured_at = body.captured_at.unwrap_or_else(Utc::now);
    match services.sessions.record_capture(id, body.passes, captured_at) {
        Ok(observations) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "session_id": id,
                "count": observations.len(),
                "observations": observations,
            })),
        )
            .into_response(),
        Err(e) => errors::session_error_to_response(e),
    }
}
