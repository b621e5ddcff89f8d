use std::sync::RwLock;

use stockmaster_scanning::{ScanHistoryQuery, ScanLogEntry};

use super::ScanLogStore;
use crate::error::StoreError;

/// In-memory scan log. Insertion order is the history order.
#[derive(Debug, Default)]
pub struct InMemoryScanLog {
    entries: RwLock<Vec<ScanLogEntry>>,
}

impl InMemoryScanLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl ScanLogStore for InMemoryScanLog {
    async fn append(&self, entry: &ScanLogEntry) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::unavailable("scan log lock poisoned"))?;
        entries.push(entry.clone());
        Ok(())
    }

    async fn history(&self, query: &ScanHistoryQuery) -> Result<Vec<ScanLogEntry>, StoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::unavailable("scan log lock poisoned"))?;
        Ok(entries
            .iter()
            .rev()
            .filter(|e| e.matches(query))
            .take(query.limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stockmaster_core::{ProductId, ScanLogId};
    use stockmaster_scanning::ScanAction;

    fn entry(barcode: &str, product_id: Option<ProductId>) -> ScanLogEntry {
        ScanLogEntry {
            id: ScanLogId::new(),
            barcode: barcode.to_string(),
            symbology: None,
            device_id: Some("camera-0".into()),
            actor: None,
            action: ScanAction::Lookup,
            product_id,
            warehouse_id: None,
            quantity: None,
            success: product_id.is_some(),
            error_message: None,
            scanned_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn history_is_newest_first_and_limited() {
        let log = InMemoryScanLog::new();
        for b in ["a", "b", "c"] {
            log.append(&entry(b, None)).await.unwrap();
        }

        let got = log.history(&ScanHistoryQuery::new(2)).await.unwrap();
        let barcodes: Vec<&str> = got.iter().map(|e| e.barcode.as_str()).collect();
        assert_eq!(barcodes, vec!["c", "b"]);
    }

    #[tokio::test]
    async fn history_filters_by_product() {
        let log = InMemoryScanLog::new();
        let p = ProductId::new();
        log.append(&entry("a", Some(p))).await.unwrap();
        log.append(&entry("b", None)).await.unwrap();
        log.append(&entry("c", Some(ProductId::new()))).await.unwrap();

        let got = log.history(&ScanHistoryQuery::default().for_product(p)).await.unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].barcode, "a");
    }
}
