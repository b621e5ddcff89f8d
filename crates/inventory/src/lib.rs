//! Stock ledger domain.
//!
//! Pure planning logic for quantity changes: given the current balance of a
//! (product, warehouse) key and an adjustment command, decide the new balance
//! and the movement that records it. No IO; the stores in `stockmaster-infra`
//! apply a plan atomically.

pub mod adjustment;
pub mod error;
pub mod level;
pub mod movement;

pub use adjustment::{
    AdjustStock, Adjustment, PlannedAdjustment, balance_from_movements, plan_adjustment,
};
pub use error::LedgerError;
pub use level::{StockKey, StockLevel};
pub use movement::{Movement, MovementKind};
