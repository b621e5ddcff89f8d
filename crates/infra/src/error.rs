use thiserror::Error;

/// Failure of a catalog or scan-log store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backing storage cannot be reached or returned garbage.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Insert violated a uniqueness rule (SKU, code or barcode).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
