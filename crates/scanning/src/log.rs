use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockmaster_core::{ProductId, ScanLogId, WarehouseId};

use crate::request::ScanAction;
use crate::symbology::Symbology;

/// Default and ceiling for history queries.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;
pub const MAX_HISTORY_LIMIT: usize = 1000;

/// Append-only audit of one scan attempt, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanLogEntry {
    pub id: ScanLogId,
    pub barcode: String,
    pub symbology: Option<Symbology>,
    pub device_id: Option<String>,
    pub actor: Option<String>,
    pub action: ScanAction,
    pub product_id: Option<ProductId>,
    pub warehouse_id: Option<WarehouseId>,
    pub quantity: Option<Decimal>,
    pub success: bool,
    pub error_message: Option<String>,
    pub scanned_at: DateTime<Utc>,
}

impl ScanLogEntry {
    pub fn matches(&self, query: &ScanHistoryQuery) -> bool {
        if let Some(p) = query.product_id {
            if self.product_id != Some(p) {
                return false;
            }
        }
        if let Some(w) = query.warehouse_id {
            if self.warehouse_id != Some(w) {
                return false;
            }
        }
        true
    }
}

/// Filter for `scan_history`. Results are newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanHistoryQuery {
    pub limit: usize,
    pub product_id: Option<ProductId>,
    pub warehouse_id: Option<WarehouseId>,
}

impl ScanHistoryQuery {
    /// Build a query; `limit` is clamped to `1..=MAX_HISTORY_LIMIT`.
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.clamp(1, MAX_HISTORY_LIMIT),
            product_id: None,
            warehouse_id: None,
        }
    }

    pub fn for_product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn for_warehouse(mut self, warehouse_id: WarehouseId) -> Self {
        self.warehouse_id = Some(warehouse_id);
        self
    }
}

impl Default for ScanHistoryQuery {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(product_id: Option<ProductId>) -> ScanLogEntry {
        ScanLogEntry {
            id: ScanLogId::new(),
            barcode: "X".into(),
            symbology: None,
            device_id: None,
            actor: None,
            action: ScanAction::Lookup,
            product_id,
            warehouse_id: None,
            quantity: None,
            success: false,
            error_message: Some("Barcode not found: X".into()),
            scanned_at: Utc::now(),
        }
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(ScanHistoryQuery::new(0).limit, 1);
        assert_eq!(ScanHistoryQuery::new(5000).limit, MAX_HISTORY_LIMIT);
        assert_eq!(ScanHistoryQuery::default().limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn product_filter_excludes_unresolved_entries() {
        let p = ProductId::new();
        let q = ScanHistoryQuery::default().for_product(p);
        assert!(entry(Some(p)).matches(&q));
        assert!(!entry(None).matches(&q));
        assert!(entry(None).matches(&ScanHistoryQuery::default()));
    }
}
