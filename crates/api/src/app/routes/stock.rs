use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use stockmaster_core::{ProductId, WarehouseId};
use stockmaster_inventory::{AdjustStock, StockKey};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/adjust", post(adjust_stock))
        .route("/:product_id/:warehouse_id", get(get_stock))
        .route("/:product_id/:warehouse_id/movements", get(get_movements))
}

fn parse_key(product_id: &str, warehouse_id: &str) -> Result<StockKey, axum::response::Response> {
    let product_id = dto::parse_product_id(product_id)?;
    let warehouse_id = dto::parse_warehouse_id(warehouse_id)?;
    Ok(StockKey::new(product_id, warehouse_id))
}

pub async fn get_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path((product_id, warehouse_id)): Path<(String, String)>,
) -> axum::response::Response {
    let key = match parse_key(&product_id, &warehouse_id) {
        Ok(k) => k,
        Err(res) => return res,
    };

    match services.ledger.quantity(key).await {
        Ok(quantity) => (
            StatusCode::OK,
            Json(dto::StockLevelResponse {
                product_id: key.product_id,
                warehouse_id: key.warehouse_id,
                quantity,
            }),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_movements(
    Extension(services): Extension<Arc<AppServices>>,
    Path((product_id, warehouse_id)): Path<(String, String)>,
) -> axum::response::Response {
    let key = match parse_key(&product_id, &warehouse_id) {
        Ok(k) => k,
        Err(res) => return res,
    };

    match services.ledger.balance(key).await {
        Ok(balance) => {
            let consistent = balance.is_consistent();
            (
                StatusCode::OK,
                Json(dto::MovementsResponse {
                    product_id: key.product_id,
                    warehouse_id: key.warehouse_id,
                    quantity: balance.quantity,
                    derived_quantity: balance.derived_quantity,
                    consistent,
                    movements: balance.movements,
                }),
            )
                .into_response()
        }
        Err(e) => errors::ledger_error_to_response(e),
    }
}

/// Both ids must name catalog records before any movement is written.
async fn ensure_known(
    services: &AppServices,
    product_id: ProductId,
    warehouse_id: WarehouseId,
) -> Result<(), axum::response::Response> {
    match services.catalog.product(product_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Err(errors::json_error(
                StatusCode::NOT_FOUND,
                "product_not_found",
                format!("Product not found: {product_id}"),
            ));
        }
        Err(e) => return Err(errors::store_error_to_response(e)),
    }
    match services.catalog.warehouse(warehouse_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(errors::json_error(
            StatusCode::NOT_FOUND,
            "warehouse_not_found",
            format!("Warehouse not found: {warehouse_id}"),
        )),
        Err(e) => Err(errors::store_error_to_response(e)),
    }
}

pub async fn adjust_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ManualAdjustBody>,
) -> axum::response::Response {
    let key = match parse_key(&body.product_id, &body.warehouse_id) {
        Ok(k) => k,
        Err(res) => return res,
    };
    let kind = match dto::parse_manual_kind(&body.movement_type) {
        Ok(k) => k,
        Err(res) => return res,
    };
    if let Err(res) = ensure_known(&services, key.product_id, key.warehouse_id).await {
        return res;
    }

    let mut cmd = AdjustStock::new(key.product_id, key.warehouse_id, body.quantity_change, kind)
        .by(body.actor)
        .on_device(body.device_id);
    if let Some(reason) = body.reason {
        cmd = cmd.with_reason(reason);
    }

    match services.ledger.adjust(cmd).await {
        Ok(adjustment) => (
            StatusCode::OK,
            Json(dto::AdjustmentResponse {
                product_id: key.product_id,
                warehouse_id: key.warehouse_id,
                old_quantity: adjustment.old_quantity,
                new_quantity: adjustment.new_quantity,
                movement_id: adjustment.movement_id,
            }),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
