use std::collections::HashMap;
use std::sync::RwLock;

use stockmaster_catalog::{Product, Warehouse};
use stockmaster_core::{ProductId, WarehouseId};

use super::{CatalogLookup, CatalogStore};
use crate::error::StoreError;

#[derive(Debug, Default)]
struct CatalogState {
    products: HashMap<ProductId, Product>,
    product_by_barcode: HashMap<String, ProductId>,
    product_by_sku: HashMap<String, ProductId>,
    warehouses: HashMap<WarehouseId, Warehouse>,
    warehouse_by_barcode: HashMap<String, WarehouseId>,
    warehouse_by_code: HashMap<String, WarehouseId>,
}

/// In-memory catalog with barcode indexes.
///
/// Intended for tests/dev and the demo backend.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product_count(&self) -> usize {
        self.state.read().map(|s| s.products.len()).unwrap_or(0)
    }

    pub fn warehouse_count(&self) -> usize {
        self.state.read().map(|s| s.warehouses.len()).unwrap_or(0)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, CatalogState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::unavailable("catalog lock poisoned"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, CatalogState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::unavailable("catalog lock poisoned"))
    }
}

#[async_trait::async_trait]
impl CatalogLookup for InMemoryCatalog {
    async fn find_product_by_barcode(&self, barcode: &str) -> Result<Option<Product>, StoreError> {
        let state = self.read()?;
        Ok(state
            .product_by_barcode
            .get(barcode)
            .and_then(|id| state.products.get(id))
            .cloned())
    }

    async fn find_warehouse_by_barcode(
        &self,
        barcode: &str,
    ) -> Result<Option<Warehouse>, StoreError> {
        let state = self.read()?;
        Ok(state
            .warehouse_by_barcode
            .get(barcode)
            .and_then(|id| state.warehouses.get(id))
            .cloned())
    }

    async fn product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    async fn warehouse(&self, id: WarehouseId) -> Result<Option<Warehouse>, StoreError> {
        Ok(self.read()?.warehouses.get(&id).cloned())
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn insert_product(&self, product: Product) -> Result<(), StoreError> {
        let mut state = self.write()?;

        if state.products.contains_key(&product.id()) {
            return Err(StoreError::conflict(format!("product {} already exists", product.id())));
        }
        if state.product_by_sku.contains_key(product.sku()) {
            return Err(StoreError::conflict(format!("sku '{}' already exists", product.sku())));
        }
        if state.product_by_barcode.contains_key(product.barcode()) {
            return Err(StoreError::conflict("product barcode already exists"));
        }

        let id = product.id();
        state.product_by_sku.insert(product.sku().to_string(), id);
        state.product_by_barcode.insert(product.barcode().to_string(), id);
        state.products.insert(id, product);
        Ok(())
    }

    async fn insert_warehouse(&self, warehouse: Warehouse) -> Result<(), StoreError> {
        let mut state = self.write()?;

        if state.warehouses.contains_key(&warehouse.id()) {
            return Err(StoreError::conflict(format!(
                "warehouse {} already exists",
                warehouse.id()
            )));
        }
        if state.warehouse_by_code.contains_key(warehouse.code()) {
            return Err(StoreError::conflict(format!(
                "warehouse code '{}' already exists",
                warehouse.code()
            )));
        }
        if state.warehouse_by_barcode.contains_key(warehouse.barcode()) {
            return Err(StoreError::conflict("warehouse barcode already exists"));
        }

        let id = warehouse.id();
        state.warehouse_by_code.insert(warehouse.code().to_string(), id);
        state.warehouse_by_barcode.insert(warehouse.barcode().to_string(), id);
        state.warehouses.insert(id, warehouse);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockmaster_catalog::WarehouseKind;

    fn product(sku: &str, barcode: &str) -> Product {
        Product::new(ProductId::new(), sku, "Widget", barcode).unwrap()
    }

    #[tokio::test]
    async fn lookup_is_exact_match() {
        let catalog = InMemoryCatalog::new();
        catalog.insert_product(product("W-1", "BC-1")).await.unwrap();

        assert!(catalog.find_product_by_barcode("BC-1").await.unwrap().is_some());
        assert!(catalog.find_product_by_barcode("bc-1").await.unwrap().is_none());
        assert!(catalog.find_product_by_barcode("BC-1 ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_sku_conflicts() {
        let catalog = InMemoryCatalog::new();
        catalog.insert_product(product("W-1", "BC-1")).await.unwrap();
        let err = catalog.insert_product(product("W-1", "BC-2")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(catalog.product_count(), 1);
    }

    #[tokio::test]
    async fn duplicate_barcode_conflicts() {
        let catalog = InMemoryCatalog::new();
        catalog.insert_product(product("W-1", "BC-1")).await.unwrap();
        let err = catalog.insert_product(product("W-2", "BC-1")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn product_and_warehouse_barcodes_are_separate_namespaces() {
        let catalog = InMemoryCatalog::new();
        catalog.insert_product(product("W-1", "SHARED")).await.unwrap();
        let wh = Warehouse::new(WarehouseId::new(), "WH-1", "Dock", WarehouseKind::Transit, "SHARED")
            .unwrap();
        catalog.insert_warehouse(wh).await.unwrap();

        assert!(catalog.find_product_by_barcode("SHARED").await.unwrap().is_some());
        assert!(catalog.find_warehouse_by_barcode("SHARED").await.unwrap().is_some());
    }
}
