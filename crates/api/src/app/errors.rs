use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockmaster_infra::{ScanError, SessionError, StoreError};
use stockmaster_inventory::LedgerError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn scan_error_to_response(err: ScanError) -> axum::response::Response {
    match err {
        ScanError::StorageUnavailable(msg) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable", msg)
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Unavailable(msg) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable", msg)
        }
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
    }
}

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        LedgerError::InsufficientStock {
            available,
            requested,
        } => (
            StatusCode::CONFLICT,
            axum::Json(json!({
                "error": "insufficient_stock",
                "message": message,
                "available": available,
                "requested": requested,
            })),
        )
            .into_response(),
        LedgerError::QuantityOverflow { available, change } => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "error": "quantity_overflow",
                "message": message,
                "available": available,
                "change": change,
            })),
        )
            .into_response(),
        LedgerError::StorageUnavailable(msg) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable", msg)
        }
    }
}

pub fn session_error_to_response(err: SessionError) -> axum::response::Response {
    match err {
        SessionError::AlreadyRunning { .. } => {
            json_error(StatusCode::CONFLICT, "already_running", err.to_string())
        }
        SessionError::NotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
    }
}
