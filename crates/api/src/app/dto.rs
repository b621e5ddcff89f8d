use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockmaster_core::{MovementId, ProductId, WarehouseId};
use stockmaster_inventory::{Movement, MovementKind};
use stockmaster_scanning::{Detection, ScanAction, ScanRequest, Symbology};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct ScanRequestBody {
    pub barcode: String,
    pub action: String,
    pub warehouse_barcode: Option<String>,
    pub quantity: Option<Decimal>,
    pub symbology: Option<String>,
    pub actor: Option<String>,
    pub device_id: Option<String>,
}

/// Body of `/scan/receipt` and `/scan/delivery`.
#[derive(Debug, Deserialize)]
pub struct StockScanBody {
    pub product_barcode: String,
    pub warehouse_barcode: String,
    pub quantity: Option<Decimal>,
    pub symbology: Option<String>,
    pub actor: Option<String>,
    pub device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub device_id: Option<String>,
    pub actor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
    pub product_id: Option<String>,
    pub warehouse_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ManualAdjustBody {
    pub product_id: String,
    pub warehouse_id: String,
    pub quantity_change: Decimal,
    pub movement_type: String,
    pub reason: Option<String>,
    pub actor: Option<String>,
    pub device_id: Option<String>,
}

/// Detection passes over one captured image.
#[derive(Debug, Deserialize)]
pub struct CaptureBody {
    pub passes: Vec<Vec<Detection>>,
    pub captured_at: Option<DateTime<Utc>>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct StockLevelResponse {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub quantity: Decimal,
}

#[derive(Debug, Serialize)]
pub struct MovementsResponse {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub quantity: Decimal,
    pub derived_quantity: Decimal,
    pub consistent: bool,
    pub movements: Vec<Movement>,
}

#[derive(Debug, Serialize)]
pub struct AdjustmentResponse {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub old_quantity: Decimal,
    pub new_quantity: Decimal,
    pub movement_id: MovementId,
}

// -------------------------
// Mapping helpers
// -------------------------

pub fn invalid_id(message: &'static str) -> axum::response::Response {
    errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", message)
}

pub fn parse_product_id(s: &str) -> Result<ProductId, axum::response::Response> {
    s.parse()
        .map_err(|_| invalid_id("invalid product id"))
}

pub fn parse_warehouse_id(s: &str) -> Result<WarehouseId, axum::response::Response> {
    s.parse()
        .map_err(|_| invalid_id("invalid warehouse id"))
}

/// Manual entry only; the scan kinds are reserved for the router.
pub fn parse_manual_kind(s: &str) -> Result<MovementKind, axum::response::Response> {
    match s.parse::<MovementKind>() {
        Ok(kind) if !kind.is_scan() => Ok(kind),
        _ => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_movement_type",
            "movement_type must be one of: receipt, delivery, transfer, adjustment",
        )),
    }
}

fn finish(
    mut req: ScanRequest,
    symbology: Option<String>,
    actor: Option<String>,
    device_id: Option<String>,
) -> ScanRequest {
    req.symbology = symbology.as_deref().map(Symbology::from);
    req.actor = actor;
    req.device_id = device_id;
    req
}

impl ScanRequestBody {
    pub fn into_request(self) -> Result<ScanRequest, axum::response::Response> {
        let action: ScanAction = self
            .action
            .parse()
            .map_err(|e: stockmaster_core::DomainError| {
                errors::json_error(StatusCode::BAD_REQUEST, "invalid_action", e.to_string())
            })?;
        let quantity = self.quantity.unwrap_or(Decimal::ONE);

        // An absent warehouse barcode still reaches the router, which records it as a failed scan.
        let warehouse_barcode = self.warehouse_barcode.unwrap_or_default();
        let req = match action {
            ScanAction::Lookup => ScanRequest::lookup(self.barcode),
            ScanAction::Receipt => ScanRequest::receipt(self.barcode, warehouse_barcode, quantity),
            ScanAction::Delivery => {
                ScanRequest::delivery(self.barcode, warehouse_barcode, quantity)
            }
        };

        Ok(finish(req, self.symbology, self.actor, self.device_id))
    }
}

impl StockScanBody {
    /// Empty barcodes are not rejected here; the router records them as failed scans.
    pub fn into_request(self, action: ScanAction) -> ScanRequest {
        let quantity = self.quantity.unwrap_or(Decimal::ONE);
        let req = match action {
            ScanAction::Delivery => {
                ScanRequest::delivery(self.product_barcode, self.warehouse_barcode, quantity)
            }
            _ => ScanRequest::receipt(self.product_barcode, self.warehouse_barcode, quantity),
        };
        finish(req, self.symbology, self.actor, self.device_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(action: &str) -> ScanRequestBody {
        ScanRequestBody {
            barcode: "BC".into(),
            action: action.into(),
            warehouse_barcode: None,
            quantity: None,
            symbology: Some("QRCODE".into()),
            actor: None,
            device_id: Some("camera-0".into()),
        }
    }

    #[test]
    fn generic_body_maps_to_request() {
        let req = body("receipt").into_request().unwrap();
        assert_eq!(req.action, ScanAction::Receipt);
        assert_eq!(req.quantity, Decimal::ONE);
        assert_eq!(req.warehouse_barcode.as_deref(), Some(""));
        assert_eq!(req.symbology, Some(Symbology::QrCode));
        assert_eq!(req.device_id.as_deref(), Some("camera-0"));
    }

    #[test]
    fn empty_barcode_reaches_the_router() {
        let mut b = body("delivery");
        b.barcode = String::new();
        let req = b.into_request().unwrap();
        assert_eq!(req.barcode, "");
        assert_eq!(req.action, ScanAction::Delivery);
    }

    #[test]
    fn unknown_action_is_rejected() {
        let res = body("teleport").into_request().unwrap_err();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn scan_kinds_are_not_manual() {
        assert!(parse_manual_kind("scan_receipt").is_err());
        assert_eq!(parse_manual_kind("transfer").unwrap(), MovementKind::Transfer);
    }
}
