use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockmaster_core::DomainError;

use crate::symbology::Symbology;

/// What the operator declared the scan to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanAction {
    Receipt,
    Delivery,
    Lookup,
}

impl ScanAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanAction::Receipt => "receipt",
            ScanAction::Delivery => "delivery",
            ScanAction::Lookup => "lookup",
        }
    }

    /// Receipt and delivery change stock; lookup only resolves.
    pub fn mutates_stock(&self) -> bool {
        !matches!(self, ScanAction::Lookup)
    }
}

impl core::fmt::Display for ScanAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "receipt" => Ok(ScanAction::Receipt),
            "delivery" => Ok(ScanAction::Delivery),
            "lookup" => Ok(ScanAction::Lookup),
            other => Err(DomainError::validation(format!(
                "unknown scan action '{other}' (expected receipt, delivery, lookup)"
            ))),
        }
    }
}

fn default_quantity() -> Decimal {
    Decimal::ONE
}

/// One scan to route.
///
/// For receipt and delivery `barcode` is the product barcode and
/// `warehouse_barcode` names the location. Lookup ignores
/// `warehouse_barcode` and `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub barcode: String,
    pub action: ScanAction,
    #[serde(default)]
    pub warehouse_barcode: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: Decimal,
    #[serde(default)]
    pub symbology: Option<Symbology>,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub scanned_at: DateTime<Utc>,
}

impl ScanRequest {
    fn new(barcode: impl Into<String>, action: ScanAction) -> Self {
        Self {
            barcode: barcode.into(),
            action,
            warehouse_barcode: None,
            quantity: default_quantity(),
            symbology: None,
            actor: None,
            device_id: None,
            scanned_at: Utc::now(),
        }
    }

    pub fn receipt(
        product_barcode: impl Into<String>,
        warehouse_barcode: impl Into<String>,
        quantity: Decimal,
    ) -> Self {
        let mut req = Self::new(product_barcode, ScanAction::Receipt);
        req.warehouse_barcode = Some(warehouse_barcode.into());
        req.quantity = quantity;
        req
    }

    pub fn delivery(
        product_barcode: impl Into<String>,
        warehouse_barcode: impl Into<String>,
        quantity: Decimal,
    ) -> Self {
        let mut req = Self::new(product_barcode, ScanAction::Delivery);
        req.warehouse_barcode = Some(warehouse_barcode.into());
        req.quantity = quantity;
        req
    }

    pub fn lookup(barcode: impl Into<String>) -> Self {
        Self::new(barcode, ScanAction::Lookup)
    }

    pub fn by(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn on_device(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    pub fn with_symbology(mut self, symbology: Symbology) -> Self {
        self.symbology = Some(symbology);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_fills_defaults() {
        let raw = r#"{"barcode":"X","action":"delivery","warehouse_barcode":"W"}"#;
        let req: ScanRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(req.action, ScanAction::Delivery);
        assert_eq!(req.quantity, Decimal::ONE);
        assert_eq!(req.warehouse_barcode.as_deref(), Some("W"));
        assert!(req.actor.is_none());
    }

    #[test]
    fn lookup_does_not_mutate() {
        assert!(!ScanAction::Lookup.mutates_stock());
        assert!(ScanAction::Delivery.mutates_stock());
    }

    #[test]
    fn action_parses_from_str() {
        assert_eq!("RECEIPT".parse::<ScanAction>().unwrap(), ScanAction::Receipt);
        assert!("transfer".parse::<ScanAction>().is_err());
    }
}
