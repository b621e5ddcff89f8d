use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockmaster_core::{DomainError, DomainResult, ProductId};

/// Default reorder threshold for new products.
pub const DEFAULT_REORDER_THRESHOLD: u32 = 10;

/// Catalog product.
///
/// `sku` and `barcode` are each unique across the catalog; the stores enforce
/// that on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    sku: String,
    name: String,
    category: Option<String>,
    unit_of_measure: Option<String>,
    reorder_threshold: Decimal,
    barcode: String,
}

impl Product {
    pub fn new(
        id: ProductId,
        sku: impl Into<String>,
        name: impl Into<String>,
        barcode: impl Into<String>,
    ) -> DomainResult<Self> {
        let sku = sku.into();
        let name = name.into();
        let barcode = barcode.into();

        if sku.trim().is_empty() {
            return Err(DomainError::validation("sku cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if barcode.is_empty() {
            return Err(DomainError::validation("barcode cannot be empty"));
        }

        Ok(Self {
            id,
            sku,
            name,
            category: None,
            unit_of_measure: None,
            reorder_threshold: Decimal::from(DEFAULT_REORDER_THRESHOLD),
            barcode,
        })
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_unit_of_measure(mut self, unit: impl Into<String>) -> Self {
        self.unit_of_measure = Some(unit.into());
        self
    }

    pub fn with_reorder_threshold(mut self, threshold: Decimal) -> Self {
        self.reorder_threshold = threshold;
        self
    }

    /// Replace the barcode with the JSON label payload printed on QR stickers.
    pub fn with_label_barcode(mut self) -> Self {
        self.barcode = crate::label::product_label(&self);
        self
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn unit_of_measure(&self) -> Option<&str> {
        self.unit_of_measure.as_deref()
    }

    pub fn reorder_threshold(&self) -> Decimal {
        self.reorder_threshold
    }

    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    /// `true` when `quantity` is at or below the reorder threshold.
    pub fn needs_reorder(&self, quantity: Decimal) -> bool {
        quantity <= self.reorder_threshold
    }

    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id,
            name: self.name.clone(),
            sku: self.sku.clone(),
        }
    }
}

/// Compact product reference embedded in scan outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steel() -> Product {
        Product::new(ProductId::new(), "STEEL-ROD-50", "Steel Rods 50kg", "BC-STEEL").unwrap()
    }

    #[test]
    fn new_product_uses_default_threshold() {
        let p = steel();
        assert_eq!(p.reorder_threshold(), Decimal::from(10));
        assert_eq!(p.category(), None);
    }

    #[test]
    fn empty_sku_is_rejected() {
        let err = Product::new(ProductId::new(), "  ", "Chair", "BC").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn empty_barcode_is_rejected() {
        let err = Product::new(ProductId::new(), "SKU", "Chair", "").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn reorder_check_is_inclusive() {
        let p = steel().with_reorder_threshold(Decimal::from(20));
        assert!(p.needs_reorder(Decimal::from(20)));
        assert!(!p.needs_reorder(Decimal::from(21)));
    }

    #[test]
    fn label_barcode_embeds_identity() {
        let p = steel().with_category("Raw Materials").with_label_barcode();
        let json: serde_json::Value = serde_json::from_str(p.barcode()).unwrap();
        assert_eq!(json["type"], "product");
        assert_eq!(json["sku"], "STEEL-ROD-50");
        assert_eq!(json["id"], p.id().to_string());
        assert_eq!(json["category"], "Raw Materials");
    }
}
