//! Catalog domain: products, warehouses and the barcodes that identify them.
//!
//! The catalog is read-only to the ledger. Entries are created by catalog
//! administration (seeding, tests); everything else only resolves them.

pub mod entry;
pub mod label;
pub mod product;
pub mod warehouse;

pub use entry::CatalogEntry;
pub use label::{product_label, warehouse_label};
pub use product::{Product, ProductSummary};
pub use warehouse::{Warehouse, WarehouseKind, WarehouseSummary};
