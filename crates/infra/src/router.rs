//! Scan action router.
//!
//! Resolves a scan against the catalog, applies it to the ledger, writes
//! exactly one scan log entry per call and broadcasts successful stock
//! changes. Recoverable failures come back as `ScanOutcome { success: false }`;
//! only storage failures surface as `Err`, and never once a stock change has
//! committed.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use stockmaster_catalog::{CatalogEntry, Product, Warehouse};
use stockmaster_core::{ProductId, ScanLogId, WarehouseId};
use stockmaster_events::{EventBus, EventEnvelope};
use stockmaster_inventory::{AdjustStock, LedgerError, MovementKind};
use stockmaster_scanning::{
    ScanAction, ScanDetail, ScanFailure, ScanLogEntry, ScanOutcome, ScanRequest,
};

use crate::catalog::CatalogLookup;
use crate::error::StoreError;
use crate::ledger::{LedgerStore, StockLedger};
use crate::scan_log::ScanLogStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Internal short-circuit for `route`.
enum RouteError {
    Failed(ScanFailure),
    Storage(String),
}

impl From<ScanFailure> for RouteError {
    fn from(value: ScanFailure) -> Self {
        Self::Failed(value)
    }
}

impl From<StoreError> for RouteError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value.to_string())
    }
}

impl From<LedgerError> for RouteError {
    fn from(value: LedgerError) -> Self {
        match value {
            LedgerError::InsufficientStock {
                available,
                requested,
            } => Self::Failed(ScanFailure::InsufficientStock {
                available,
                requested,
            }),
            LedgerError::QuantityOverflow { available, change } => {
                Self::Failed(ScanFailure::QuantityOverflow { available, change })
            }
            LedgerError::StorageUnavailable(msg) => Self::Storage(msg),
        }
    }
}

/// What a scan resolved to, filled in as routing progresses so failures can
/// still be attributed in the log.
#[derive(Debug, Default)]
struct Resolution {
    product_id: Option<ProductId>,
    warehouse_id: Option<WarehouseId>,
}

struct Routed {
    detail: ScanDetail,
    reason: Option<String>,
}

pub struct ScanRouter<C, L, S, B> {
    catalog: C,
    ledger: StockLedger<L>,
    scan_log: S,
    bus: B,
}

impl<C, L, S, B> ScanRouter<C, L, S, B>
where
    C: CatalogLookup,
    L: LedgerStore,
    S: ScanLogStore,
    B: EventBus<EventEnvelope<ScanOutcome>>,
{
    pub fn new(catalog: C, ledger: StockLedger<L>, scan_log: S, bus: B) -> Self {
        Self {
            catalog,
            ledger,
            scan_log,
            bus,
        }
    }

    pub fn ledger(&self) -> &StockLedger<L> {
        &self.ledger
    }

    #[instrument(
        skip(self, request),
        fields(action = %request.action, device_id = ?request.device_id)
    )]
    pub async fn handle_scan(&self, request: ScanRequest) -> Result<ScanOutcome, ScanError> {
        let scan_id = ScanLogId::new();
        let mut resolution = Resolution::default();

        let routed = self.route(&request, &mut resolution).await;

        let (outcome, error_message) = match routed {
            Ok(Routed { detail, reason }) => {
                (ScanOutcome::succeeded(scan_id, &request, detail, reason), None)
            }
            Err(RouteError::Failed(failure)) => {
                tracing::warn!(
                    code = failure.code(),
                    reason = %failure,
                    "scan failed"
                );
                let message = failure.to_string();
                (ScanOutcome::failed(scan_id, &request, failure), Some(message))
            }
            Err(RouteError::Storage(msg)) => {
                tracing::error!(error = %msg, "scan aborted: storage unavailable");
                let entry = log_entry(scan_id, &request, &resolution, false, Some(msg.clone()));
                if let Err(log_err) = self.scan_log.append(&entry).await {
                    tracing::error!(error = %log_err, "failed to record aborted scan");
                }
                return Err(ScanError::StorageUnavailable(msg));
            }
        };

        // A committed stock change stands even if its audit entry cannot be written.
        let committed = outcome.success && request.action.mutates_stock();

        let entry = log_entry(scan_id, &request, &resolution, outcome.success, error_message);
        if let Err(e) = self.scan_log.append(&entry).await {
            tracing::error!(scan_id = %scan_id, committed, error = %e, "failed to record scan");
            if !committed {
                return Err(ScanError::StorageUnavailable(e.to_string()));
            }
        }

        if committed {
            self.broadcast(&outcome);
        }

        Ok(outcome)
    }

    fn broadcast(&self, outcome: &ScanOutcome) {
        if let Err(err) = self.bus.publish(EventEnvelope::wrap(outcome.clone())) {
            tracing::warn!(scan_id = %outcome.scan_id, error = ?err, "scan broadcast failed");
        }
    }

    async fn route(
        &self,
        request: &ScanRequest,
        resolution: &mut Resolution,
    ) -> Result<Routed, RouteError> {
        if request.barcode.is_empty() {
            return Err(ScanFailure::EmptyBarcode.into());
        }

        match request.action {
            ScanAction::Lookup => self.lookup(request, resolution).await,
            ScanAction::Receipt | ScanAction::Delivery => {
                self.move_stock(request, resolution).await
            }
        }
    }

    async fn lookup(
        &self,
        request: &ScanRequest,
        resolution: &mut Resolution,
    ) -> Result<Routed, RouteError> {
        if let Some(product) = self.catalog.find_product_by_barcode(&request.barcode).await? {
            resolution.product_id = Some(product.id());
            return Ok(Routed {
                detail: ScanDetail::Resolved {
                    entry: CatalogEntry::Product(product),
                },
                reason: None,
            });
        }

        if let Some(warehouse) = self.catalog.find_warehouse_by_barcode(&request.barcode).await? {
            resolution.warehouse_id = Some(warehouse.id());
            return Ok(Routed {
                detail: ScanDetail::Resolved {
                    entry: CatalogEntry::Warehouse(warehouse),
                },
                reason: None,
            });
        }

        Err(ScanFailure::BarcodeNotFound {
            barcode: request.barcode.clone(),
        }
        .into())
    }

    async fn move_stock(
        &self,
        request: &ScanRequest,
        resolution: &mut Resolution,
    ) -> Result<Routed, RouteError> {
        if request.quantity < Decimal::ZERO {
            return Err(ScanFailure::InvalidQuantity {
                quantity: request.quantity,
            }
            .into());
        }

        let warehouse_barcode = match request.warehouse_barcode.as_deref() {
            Some(b) if !b.is_empty() => b,
            _ => return Err(ScanFailure::MissingWarehouseBarcode.into()),
        };

        let product = self.resolve_product(&request.barcode).await?;
        resolution.product_id = Some(product.id());

        let warehouse = self.resolve_warehouse(warehouse_barcode).await?;
        resolution.warehouse_id = Some(warehouse.id());

        let (kind, change, reason) = match request.action {
            ScanAction::Delivery => (
                MovementKind::ScanDelivery,
                -request.quantity,
                format!("Scanned delivery: {}", product.name()),
            ),
            _ => (
                MovementKind::ScanReceipt,
                request.quantity,
                format!("Scanned receipt: {}", product.name()),
            ),
        };

        let cmd = AdjustStock::new(product.id(), warehouse.id(), change, kind)
            .with_reason(reason.clone())
            .by(request.actor.clone())
            .on_device(request.device_id.clone())
            .at(request.scanned_at);

        let adjustment = self.ledger.adjust(cmd).await?;

        Ok(Routed {
            detail: ScanDetail::StockChanged {
                product: product.summary(),
                warehouse: warehouse.summary(),
                old_quantity: adjustment.old_quantity,
                new_quantity: adjustment.new_quantity,
                quantity_change: change,
                movement_id: adjustment.movement_id,
                below_reorder_threshold: product.needs_reorder(adjustment.new_quantity),
            },
            reason: Some(reason),
        })
    }

    async fn resolve_product(&self, barcode: &str) -> Result<Product, RouteError> {
        self.catalog
            .find_product_by_barcode(barcode)
            .await?
            .ok_or_else(|| {
                ScanFailure::ProductNotFound {
                    barcode: barcode.to_string(),
                }
                .into()
            })
    }

    async fn resolve_warehouse(&self, barcode: &str) -> Result<Warehouse, RouteError> {
        self.catalog
            .find_warehouse_by_barcode(barcode)
            .await?
            .ok_or_else(|| {
                ScanFailure::WarehouseNotFound {
                    barcode: barcode.to_string(),
                }
                .into()
            })
    }
}

fn log_entry(
    scan_id: ScanLogId,
    request: &ScanRequest,
    resolution: &Resolution,
    success: bool,
    error_message: Option<String>,
) -> ScanLogEntry {
    ScanLogEntry {
        id: scan_id,
        barcode: request.barcode.clone(),
        symbology: request.symbology,
        device_id: request.device_id.clone(),
        actor: request.actor.clone(),
        action: request.action,
        product_id: resolution.product_id,
        warehouse_id: resolution.warehouse_id,
        quantity: request.action.mutates_stock().then_some(request.quantity),
        success,
        error_message,
        scanned_at: request.scanned_at,
    }
}
