use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};
use chrono::Utc;

use crate::app::services::AppServices;

pub async fn root(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "stockmaster",
        "version": env!("CARGO_PKG_VERSION"),
        "backend": services.backend,
        "active_sessions": services.sessions.active_count(),
    }))
}

pub async fn health(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "sessions": services.sessions.active_count(),
    }))
}
