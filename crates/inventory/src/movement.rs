use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockmaster_core::{DomainError, MovementId, ProductId, WarehouseId};

use crate::level::StockKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Receipt,
    Delivery,
    Transfer,
    Adjustment,
    ScanReceipt,
    ScanDelivery,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Receipt => "receipt",
            MovementKind::Delivery => "delivery",
            MovementKind::Transfer => "transfer",
            MovementKind::Adjustment => "adjustment",
            MovementKind::ScanReceipt => "scan_receipt",
            MovementKind::ScanDelivery => "scan_delivery",
        }
    }

    /// Kinds produced by the scan router rather than manual entry.
    pub fn is_scan(&self) -> bool {
        matches!(self, MovementKind::ScanReceipt | MovementKind::ScanDelivery)
    }
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "receipt" => Ok(MovementKind::Receipt),
            "delivery" => Ok(MovementKind::Delivery),
            "transfer" => Ok(MovementKind::Transfer),
            "adjustment" => Ok(MovementKind::Adjustment),
            "scan_receipt" => Ok(MovementKind::ScanReceipt),
            "scan_delivery" => Ok(MovementKind::ScanDelivery),
            other => Err(DomainError::validation(format!("unknown movement kind '{other}'"))),
        }
    }
}

/// Immutable audit record of one committed adjustment.
///
/// `quantity` is the magnitude of `quantity_change`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub kind: MovementKind,
    pub quantity_change: Decimal,
    pub quantity: Decimal,
    pub reason: Option<String>,
    pub actor: Option<String>,
    pub device_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Movement {
    pub fn key(&self) -> StockKey {
        StockKey::new(self.product_id, self.warehouse_id)
    }
}
