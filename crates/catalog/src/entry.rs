use serde::{Deserialize, Serialize};

use crate::product::Product;
use crate::warehouse::Warehouse;

/// Result of resolving a barcode against the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum CatalogEntry {
    Product(Product),
    Warehouse(Warehouse),
}

impl CatalogEntry {
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogEntry::Product(_) => "product",
            CatalogEntry::Warehouse(_) => "warehouse",
        }
    }
}
