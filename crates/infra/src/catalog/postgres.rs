//! Postgres-backed catalog.
//!
//! Unique violations (`23505`) on insert map to `StoreError::Conflict`; every
//! other sqlx failure maps to `StoreError::Unavailable`.

use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use stockmaster_catalog::{Product, Warehouse, WarehouseKind};
use stockmaster_core::{ProductId, WarehouseId};

use super::{CatalogLookup, CatalogStore};
use crate::error::StoreError;
use crate::postgres::{describe, is_unique_violation};

#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: Arc<PgPool>,
}

impl PostgresCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::Conflict(describe(operation, &err))
    } else {
        StoreError::Unavailable(describe(operation, &err))
    }
}

const PRODUCT_COLUMNS: &str = "id, sku, name, category, unit_of_measure, reorder_threshold, barcode";
const WAREHOUSE_COLUMNS: &str = "id, code, name, location, warehouse_type, barcode";

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    let read = |e: sqlx::Error| map_sqlx_error("decode_product", e);

    let id: uuid::Uuid = row.try_get("id").map_err(read)?;
    let sku: String = row.try_get("sku").map_err(read)?;
    let name: String = row.try_get("name").map_err(read)?;
    let category: Option<String> = row.try_get("category").map_err(read)?;
    let unit: Option<String> = row.try_get("unit_of_measure").map_err(read)?;
    let threshold: Decimal = row.try_get("reorder_threshold").map_err(read)?;
    let barcode: String = row.try_get("barcode").map_err(read)?;

    let mut product = Product::new(ProductId::from_uuid(id), sku, name, barcode)
        .map_err(|e| StoreError::unavailable(format!("invalid product row {id}: {e}")))?
        .with_reorder_threshold(threshold);
    if let Some(category) = category {
        product = product.with_category(category);
    }
    if let Some(unit) = unit {
        product = product.with_unit_of_measure(unit);
    }
    Ok(product)
}

fn warehouse_from_row(row: &PgRow) -> Result<Warehouse, StoreError> {
    let read = |e: sqlx::Error| map_sqlx_error("decode_warehouse", e);

    let id: uuid::Uuid = row.try_get("id").map_err(read)?;
    let code: String = row.try_get("code").map_err(read)?;
    let name: String = row.try_get("name").map_err(read)?;
    let location: Option<String> = row.try_get("location").map_err(read)?;
    let kind: String = row.try_get("warehouse_type").map_err(read)?;
    let barcode: String = row.try_get("barcode").map_err(read)?;

    let kind: WarehouseKind = kind
        .parse()
        .map_err(|e| StoreError::unavailable(format!("invalid warehouse row {id}: {e}")))?;
    let mut warehouse = Warehouse::new(WarehouseId::from_uuid(id), code, name, kind, barcode)
        .map_err(|e| StoreError::unavailable(format!("invalid warehouse row {id}: {e}")))?;
    if let Some(location) = location {
        warehouse = warehouse.with_location(location);
    }
    Ok(warehouse)
}

#[async_trait::async_trait]
impl CatalogLookup for PostgresCatalog {
    #[instrument(skip(self, barcode), fields(barcode_len = barcode.len()), err)]
    async fn find_product_by_barcode(&self, barcode: &str) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = $1"))
            .bind(barcode)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_product_by_barcode", e))?;
        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self, barcode), fields(barcode_len = barcode.len()), err)]
    async fn find_warehouse_by_barcode(
        &self,
        barcode: &str,
    ) -> Result<Option<Warehouse>, StoreError> {
        let sql = format!("SELECT {WAREHOUSE_COLUMNS} FROM warehouses WHERE barcode = $1");
        let row = sqlx::query(&sql)
            .bind(barcode)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_warehouse_by_barcode", e))?;
        row.as_ref().map(warehouse_from_row).transpose()
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("product", e))?;
        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self), fields(warehouse_id = %id), err)]
    async fn warehouse(&self, id: WarehouseId) -> Result<Option<Warehouse>, StoreError> {
        let row = sqlx::query(&format!("SELECT {WAREHOUSE_COLUMNS} FROM warehouses WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("warehouse", e))?;
        row.as_ref().map(warehouse_from_row).transpose()
    }
}

#[async_trait::async_trait]
impl CatalogStore for PostgresCatalog {
    #[instrument(skip(self, product), fields(sku = product.sku()), err)]
    async fn insert_product(&self, product: Product) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, sku, name, category, unit_of_measure, reorder_threshold, barcode)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(product.id().as_uuid())
        .bind(product.sku())
        .bind(product.name())
        .bind(product.category())
        .bind(product.unit_of_measure())
        .bind(product.reorder_threshold())
        .bind(product.barcode())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_product", e))?;
        Ok(())
    }

    #[instrument(skip(self, warehouse), fields(code = warehouse.code()), err)]
    async fn insert_warehouse(&self, warehouse: Warehouse) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO warehouses (id, code, name, location, warehouse_type, barcode)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(warehouse.id().as_uuid())
        .bind(warehouse.code())
        .bind(warehouse.name())
        .bind(warehouse.location())
        .bind(warehouse.kind().as_str())
        .bind(warehouse.barcode())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_warehouse", e))?;
        Ok(())
    }
}
