use rust_decimal::Decimal;
use thiserror::Error;

/// Failure of a ledger adjustment. Every variant leaves state untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: Decimal, requested: Decimal },

    #[error("quantity out of range: {available} + {change} overflows")]
    QuantityOverflow { available: Decimal, change: Decimal },

    #[error("ledger storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl LedgerError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }
}
