use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockmaster_catalog::{CatalogEntry, ProductSummary, WarehouseSummary};
use stockmaster_core::{MovementId, ScanLogId};
use stockmaster_events::Event;

use crate::request::{ScanAction, ScanRequest};

/// Recoverable reasons a scan did not succeed.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ScanFailure {
    #[error("Barcode is empty")]
    EmptyBarcode,

    #[error("Product not found for barcode: {barcode}")]
    ProductNotFound { barcode: String },

    #[error("Warehouse not found for barcode: {barcode}")]
    WarehouseNotFound { barcode: String },

    #[error("Barcode not found: {barcode}")]
    BarcodeNotFound { barcode: String },

    #[error("Warehouse barcode is required for receipt and delivery scans")]
    MissingWarehouseBarcode,

    #[error("Quantity must not be negative: {quantity}")]
    InvalidQuantity { quantity: Decimal },

    #[error("Insufficient stock. Available: {available}, Requested: {requested}")]
    InsufficientStock { available: Decimal, requested: Decimal },

    #[error("Quantity out of range. Available: {available}, Change: {change}")]
    QuantityOverflow { available: Decimal, change: Decimal },
}

impl ScanFailure {
    pub fn code(&self) -> &'static str {
        match self {
            ScanFailure::EmptyBarcode => "empty_barcode",
            ScanFailure::ProductNotFound { .. } => "product_not_found",
            ScanFailure::WarehouseNotFound { .. } => "warehouse_not_found",
            ScanFailure::BarcodeNotFound { .. } => "barcode_not_found",
            ScanFailure::MissingWarehouseBarcode => "missing_warehouse_barcode",
            ScanFailure::InvalidQuantity { .. } => "invalid_quantity",
            ScanFailure::InsufficientStock { .. } => "insufficient_stock",
            ScanFailure::QuantityOverflow { .. } => "quantity_overflow",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ScanFailure::ProductNotFound { .. }
                | ScanFailure::WarehouseNotFound { .. }
                | ScanFailure::BarcodeNotFound { .. }
        )
    }
}

/// What a successful scan resolved to or changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanDetail {
    StockChanged {
        product: ProductSummary,
        warehouse: WarehouseSummary,
        old_quantity: Decimal,
        new_quantity: Decimal,
        quantity_change: Decimal,
        movement_id: MovementId,
        below_reorder_threshold: bool,
    },
    Resolved { entry: CatalogEntry },
}

/// Result of routing one scan. Also the `scan_result` broadcast payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOutcome {
    /// Id of the scan log entry written for this attempt.
    pub scan_id: ScanLogId,
    pub action: ScanAction,
    pub barcode: String,
    pub success: bool,
    pub detail: Option<ScanDetail>,
    pub failure: Option<ScanFailure>,
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ScanOutcome {
    pub fn succeeded(
        scan_id: ScanLogId,
        request: &ScanRequest,
        detail: ScanDetail,
        reason: Option<String>,
    ) -> Self {
        Self {
            scan_id,
            action: request.action,
            barcode: request.barcode.clone(),
            success: true,
            detail: Some(detail),
            failure: None,
            reason,
            timestamp: request.scanned_at,
        }
    }

    pub fn failed(scan_id: ScanLogId, request: &ScanRequest, failure: ScanFailure) -> Self {
        Self {
            scan_id,
            action: request.action,
            barcode: request.barcode.clone(),
            success: false,
            detail: None,
            reason: Some(failure.to_string()),
            failure: Some(failure),
            timestamp: request.scanned_at,
        }
    }

    /// New balance when the scan changed stock.
    pub fn new_quantity(&self) -> Option<Decimal> {
        match &self.detail {
            Some(ScanDetail::StockChanged { new_quantity, .. }) => Some(*new_quantity),
            _ => None,
        }
    }
}

impl Event for ScanOutcome {
    fn event_type(&self) -> &'static str {
        "scan_result"
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
