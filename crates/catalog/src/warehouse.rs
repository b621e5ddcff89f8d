use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockmaster_core::{DomainError, DomainResult, WarehouseId};

/// Role of a stock location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarehouseKind {
    Main,
    Production,
    Storage,
    Transit,
}

impl WarehouseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarehouseKind::Main => "main",
            WarehouseKind::Production => "production",
            WarehouseKind::Storage => "storage",
            WarehouseKind::Transit => "transit",
        }
    }
}

impl core::fmt::Display for WarehouseKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WarehouseKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "main" => Ok(WarehouseKind::Main),
            "production" => Ok(WarehouseKind::Production),
            "storage" => Ok(WarehouseKind::Storage),
            "transit" => Ok(WarehouseKind::Transit),
            other => Err(DomainError::validation(format!(
                "unknown warehouse kind '{other}' (expected main, production, storage, transit)"
            ))),
        }
    }
}

/// Warehouse / stock location. `code` and `barcode` are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    id: WarehouseId,
    code: String,
    name: String,
    location: Option<String>,
    kind: WarehouseKind,
    barcode: String,
}

impl Warehouse {
    pub fn new(
        id: WarehouseId,
        code: impl Into<String>,
        name: impl Into<String>,
        kind: WarehouseKind,
        barcode: impl Into<String>,
    ) -> DomainResult<Self> {
        let code = code.into();
        let name = name.into();
        let barcode = barcode.into();

        if code.trim().is_empty() {
            return Err(DomainError::validation("warehouse code cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation("warehouse name cannot be empty"));
        }
        if barcode.is_empty() {
            return Err(DomainError::validation("barcode cannot be empty"));
        }

        Ok(Self {
            id,
            code,
            name,
            location: None,
            kind,
            barcode,
        })
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Replace the barcode with the JSON label payload printed on QR stickers.
    pub fn with_label_barcode(mut self) -> Self {
        self.barcode = crate::label::warehouse_label(&self);
        self
    }

    pub fn id(&self) -> WarehouseId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn kind(&self) -> WarehouseKind {
        self.kind
    }

    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    pub fn summary(&self) -> WarehouseSummary {
        WarehouseSummary {
            id: self.id,
            name: self.name.clone(),
            code: self.code.clone(),
        }
    }
}

/// Compact warehouse reference embedded in scan outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseSummary {
    pub id: WarehouseId,
    pub name: String,
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Transit".parse::<WarehouseKind>().unwrap(), WarehouseKind::Transit);
        assert!("dock".parse::<WarehouseKind>().is_err());
    }

    #[test]
    fn empty_code_is_rejected() {
        let err =
            Warehouse::new(WarehouseId::new(), "", "Main", WarehouseKind::Main, "BC").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn label_barcode_embeds_identity() {
        let wh = Warehouse::new(
            WarehouseId::new(),
            "WH-MAIN",
            "Main Warehouse",
            WarehouseKind::Main,
            "tmp",
        )
        .unwrap()
        .with_location("Building A, Ground Floor")
        .with_label_barcode();
        let json: serde_json::Value = serde_json::from_str(wh.barcode()).unwrap();
        assert_eq!(json["type"], "warehouse");
        assert_eq!(json["code"], "WH-MAIN");
        assert_eq!(json["warehouse_type"], "main");
        assert_eq!(json["location"], "Building A, Ground Floor");
    }
}
