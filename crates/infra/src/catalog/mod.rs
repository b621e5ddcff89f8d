//! Catalog lookup boundary.
//!
//! Barcode resolution for the router plus the inserts used by seeding and
//! tests. Lookups are exact string matches.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use stockmaster_catalog::{Product, Warehouse};
use stockmaster_core::{ProductId, WarehouseId};

use crate::error::StoreError;

pub use in_memory::InMemoryCatalog;
pub use postgres::PostgresCatalog;

/// Read-only catalog queries.
#[async_trait::async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn find_product_by_barcode(&self, barcode: &str) -> Result<Option<Product>, StoreError>;

    async fn find_warehouse_by_barcode(
        &self,
        barcode: &str,
    ) -> Result<Option<Warehouse>, StoreError>;

    async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    async fn warehouse(&self, id: WarehouseId) -> Result<Option<Warehouse>, StoreError>;
}

/// Catalog administration. Inserts enforce SKU/code and barcode uniqueness.
#[async_trait::async_trait]
pub trait CatalogStore: CatalogLookup {
    async fn insert_product(&self, product: Product) -> Result<(), StoreError>;

    async fn insert_warehouse(&self, warehouse: Warehouse) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<S> CatalogLookup for Arc<S>
where
    S: CatalogLookup + ?Sized,
{
    async fn find_product_by_barcode(&self, barcode: &str) -> Result<Option<Product>, StoreError> {
        (**self).find_product_by_barcode(barcode).await
    }

    async fn find_warehouse_by_barcode(
        &self,
        barcode: &str,
    ) -> Result<Option<Warehouse>, StoreError> {
        (**self).find_warehouse_by_barcode(barcode).await
    }

    async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).product(id).await
    }

    async fn warehouse(&self, id: WarehouseId) -> Result<Option<Warehouse>, StoreError> {
        (**self).warehouse(id).await
    }
}

#[async_trait::async_trait]
impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    async fn insert_product(&self, product: Product) -> Result<(), StoreError> {
        (**self).insert_product(product).await
    }

    async fn insert_warehouse(&self, warehouse: Warehouse) -> Result<(), StoreError> {
        (**self).insert_warehouse(warehouse).await
    }
}
