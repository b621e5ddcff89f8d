use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use stockmaster_scanning::{merge, ScanAction, ScanHistoryQuery, ScanRequest};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", post(scan))
        .route("/receipt", post(scan_receipt))
        .route("/delivery", post(scan_delivery))
        .route("/lookup/:barcode", get(lookup))
        .route("/history", get(history))
        .route("/observations", post(merge_observations))
}

async fn route(services: &AppServices, request: ScanRequest) -> axum::response::Response {
    match services.router.handle_scan(request).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => errors::scan_error_to_response(e),
    }
}

pub async fn scan(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ScanRequestBody>,
) -> axum::response::Response {
    match body.into_request() {
        Ok(request) => route(&services, request).await,
        Err(res) => res,
    }
}

pub async fn scan_receipt(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::StockScanBody>,
) -> axum::response::Response {
    route(&services, body.into_request(ScanAction::Receipt)).await
}

pub async fn scan_delivery(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::StockScanBody>,
) -> axum::response::Response {
    route(&services, body.into_request(ScanAction::Delivery)).await
}

/// GET /scan/lookup/:barcode
///
/// Not-found is still an audited scan; the outcome is returned with 404.
pub async fn lookup(
    Extension(services): Extension<Arc<AppServices>>,
    Path(barcode): Path<String>,
    Query(q): Query<dto::LookupQuery>,
) -> axum::response::Response {
    let mut request = ScanRequest::lookup(barcode);
    request.actor = q.actor;
    request.device_id = q.device_id;

    match services.router.handle_scan(request).await {
        Ok(outcome) if outcome.success => (StatusCode::OK, Json(outcome)).into_response(),
        Ok(outcome) => (StatusCode::NOT_FOUND, Json(outcome)).into_response(),
        Err(e) => errors::scan_error_to_response(e),
    }
}

pub async fn history(
    Extension(services): Extension<Arc<AppServices>>,
    Query(q): Query<dto::HistoryQuery>,
) -> axum::response::Response {
    let mut query = ScanHistoryQuery::new(q.limit.unwrap_or(services.history_limit));
    if let Some(raw) = q.product_id.as_deref() {
        match dto::parse_product_id(raw) {
            Ok(id) => query = query.for_product(id),
            Err(res) => return res,
        }
    }
    if let Some(raw) = q.warehouse_id.as_deref() {
        match dto::parse_warehouse_id(raw) {
            Ok(id) => query = query.for_warehouse(id),
            Err(res) => return res,
        }
    }

    match services.scan_log.history(&query).await {
        Ok(entries) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "count": entries.len(),
                "entries": entries,
            })),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// POST /scan/observations
///
/// Stateless merge of one capture's detection passes.
pub async fn merge_observations(Json(body): Json<dto::CaptureBody>) -> axum::response::Response {
    let observations = merge(body.passes, body.captured_at.unwrap_or_else(Utc::now));
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "count": observations.len(),
            "observations": observations,
        })),
    )
        .into_response()
}
