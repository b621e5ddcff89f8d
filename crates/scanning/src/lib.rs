//! Scanning domain.
//!
//! Barcode observations and their deduplication, scan requests and outcomes,
//! the scan audit record, and scanner session state. Pure types and
//! functions; the router that drives catalog and ledger lives in infra.

pub mod log;
pub mod observation;
pub mod outcome;
pub mod request;
pub mod session;
pub mod symbology;

pub use log::{ScanHistoryQuery, ScanLogEntry};
pub use observation::{Detection, Observation, Region, merge};
pub use outcome::{ScanDetail, ScanFailure, ScanOutcome};
pub use request::{ScanAction, ScanRequest};
pub use session::{ScannerConfig, ScannerSession};
pub use symbology::Symbology;
