//! QR label payloads.
//!
//! The JSON document encoded into a printed QR sticker. Decoding the sticker
//! yields this exact string, which is why it doubles as the catalog barcode.
//! Rendering the image is done elsewhere.

use serde_json::json;

use crate::product::Product;
use crate::warehouse::Warehouse;

pub fn product_label(product: &Product) -> String {
    json!({
        "type": "product",
        "id": product.id().to_string(),
        "sku": product.sku(),
        "name": product.name(),
        "category": product.category(),
        "unit_of_measure": product.unit_of_measure(),
    })
    .to_string()
}

pub fn warehouse_label(warehouse: &Warehouse) -> String {
    json!({
        "type": "warehouse",
        "id": warehouse.id().to_string(),
        "code": warehouse.code(),
        "name": warehouse.name(),
        "location": warehouse.location(),
        "warehouse_type": warehouse.kind().as_str(),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockmaster_core::ProductId;

    #[test]
    fn label_is_stable_for_same_product() {
        let p = Product::new(ProductId::new(), "DESK-WD-120", "Wooden Desk 120cm", "x").unwrap();
        assert_eq!(product_label(&p), product_label(&p));
    }

    #[test]
    fn labels_differ_between_products() {
        let a = Product::new(ProductId::new(), "A", "A", "x").unwrap();
        let b = Product::new(ProductId::new(), "B", "B", "x").unwrap();
        assert_ne!(product_label(&a), product_label(&b));
    }
}
