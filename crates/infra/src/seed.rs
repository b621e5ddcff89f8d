//! Demo catalog and opening stock.

use rust_decimal::Decimal;
use thiserror::Error;

use stockmaster_catalog::{Product, Warehouse, WarehouseKind};
use stockmaster_core::{DomainError, ProductId, WarehouseId};
use stockmaster_inventory::{AdjustStock, LedgerError, MovementKind};

use crate::catalog::CatalogStore;
use crate::error::StoreError;
use crate::ledger::{LedgerStore, StockLedger};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// What `seed_demo` created, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct DemoCatalog {
    pub products: Vec<Product>,
    pub warehouses: Vec<Warehouse>,
}

impl DemoCatalog {
    pub fn product(&self, sku: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.sku() == sku)
    }

    pub fn warehouse(&self, code: &str) -> Option<&Warehouse> {
        self.warehouses.iter().find(|w| w.code() == code)
    }
}

const PRODUCTS: &[(&str, &str, &str, &str, i64)] = &[
    ("STEEL-ROD-50", "Steel Rods 50kg", "Raw Materials", "kg", 20),
    ("CHAIR-OFF-001", "Office Chair Executive", "Furniture", "unit", 5),
    ("DESK-WD-120", "Wooden Desk 120cm", "Furniture", "unit", 3),
    ("LAPTOP-HP-15", "HP Laptop i5 8GB", "Electronics", "unit", 2),
    ("PAINT-WHT-5L", "White Paint 5L", "Building Materials", "liters", 10),
];

const WAREHOUSES: &[(&str, &str, &str, WarehouseKind)] = &[
    ("WH-MAIN", "Main Warehouse", "Building A, Ground Floor", WarehouseKind::Main),
    ("WH-PROD", "Production Floor", "Building B, Floor 1", WarehouseKind::Production),
    ("WH-STOR-A", "Storage Rack A", "Building A, Floor 2", WarehouseKind::Storage),
    ("WH-STOR-B", "Storage Rack B", "Building A, Floor 3", WarehouseKind::Storage),
];

/// (sku, warehouse code, quantity)
const OPENING_STOCK: &[(&str, &str, i64)] = &[
    ("STEEL-ROD-50", "WH-MAIN", 100),
    ("CHAIR-OFF-001", "WH-MAIN", 25),
    ("DESK-WD-120", "WH-PROD", 15),
    ("LAPTOP-HP-15", "WH-STOR-A", 8),
    ("PAINT-WHT-5L", "WH-STOR-B", 50),
];

/// Load the demo products, warehouses and opening balances.
///
/// Barcodes are the QR label payloads. Opening balances are recorded as
/// `Receipt` movements so the history explains every balance.
pub async fn seed_demo<C, L>(catalog: &C, ledger: &StockLedger<L>) -> Result<DemoCatalog, SeedError>
where
    C: CatalogStore + ?Sized,
    L: LedgerStore,
{
    let mut demo = DemoCatalog::default();

    for (sku, name, category, unit, threshold) in PRODUCTS {
        // Placeholder barcode is replaced by the label before insert.
        let product = Product::new(ProductId::new(), *sku, *name, *sku)?
            .with_category(*category)
            .with_unit_of_measure(*unit)
            .with_reorder_threshold(Decimal::from(*threshold))
            .with_label_barcode();
        catalog.insert_product(product.clone()).await?;
        demo.products.push(product);
    }

    for (code, name, location, kind) in WAREHOUSES {
        let warehouse = Warehouse::new(WarehouseId::new(), *code, *name, *kind, *code)?
            .with_location(*location)
            .with_label_barcode();
        catalog.insert_warehouse(warehouse.clone()).await?;
        demo.warehouses.push(warehouse);
    }

    for (sku, code, quantity) in OPENING_STOCK {
        let (Some(product), Some(warehouse)) = (demo.product(sku), demo.warehouse(code)) else {
            continue;
        };
        let cmd = AdjustStock::new(
            product.id(),
            warehouse.id(),
            Decimal::from(*quantity),
            MovementKind::Receipt,
        )
        .with_reason("Initial stock")
        .by(Some("system".to_string()));
        ledger.adjust(cmd).await?;
    }

    tracing::info!(
        products = demo.products.len(),
        warehouses = demo.warehouses.len(),
        "demo catalog seeded"
    );

    Ok(demo)
}
