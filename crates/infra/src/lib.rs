//! Infrastructure layer: stores, the ledger engine, the scan router.
//!
//! Every store is defined as an async trait with an in-memory implementation
//! (tests, demo mode) and a Postgres implementation (sqlx).

pub mod catalog;
pub mod error;
pub mod ledger;
pub mod postgres;
pub mod router;
pub mod scan_log;
pub mod seed;
pub mod sessions;

pub use catalog::{CatalogLookup, CatalogStore, InMemoryCatalog, PostgresCatalog};
pub use error::StoreError;
pub use ledger::{InMemoryLedgerStore, LedgerBalance, LedgerStore, PostgresLedgerStore, StockLedger};
pub use router::{ScanError, ScanRouter};
pub use scan_log::{InMemoryScanLog, PostgresScanLog, ScanLogStore};
pub use seed::{DemoCatalog, SeedError, seed_demo};
pub use sessions::{ScannerSessionManager, SessionError};
