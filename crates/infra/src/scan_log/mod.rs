//! Append-only scan audit trail.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use stockmaster_scanning::{ScanHistoryQuery, ScanLogEntry};

use crate::error::StoreError;

pub use in_memory::InMemoryScanLog;
pub use postgres::PostgresScanLog;

#[async_trait::async_trait]
pub trait ScanLogStore: Send + Sync {
    async fn append(&self, entry: &ScanLogEntry) -> Result<(), StoreError>;

    /// Matching entries, newest first, at most `query.limit`.
    async fn history(&self, query: &ScanHistoryQuery) -> Result<Vec<ScanLogEntry>, StoreError>;
}

#[async_trait::async_trait]
impl<S> ScanLogStore for Arc<S>
where
    S: ScanLogStore + ?Sized,
{
    async fn append(&self, entry: &ScanLogEntry) -> Result<(), StoreError> {
        (**self).append(entry).await
    }

    async fn history(&self, query: &ScanHistoryQuery) -> Result<Vec<ScanLogEntry>, StoreError> {
        (**self).history(query).await
    }
}
