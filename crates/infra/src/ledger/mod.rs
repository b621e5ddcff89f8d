//! Stock ledger engine and its storage boundary.
//!
//! `LedgerStore::adjust` is the only mutating entry point. An implementation
//! must apply the read, the balance write and the movement insert for one
//! (product, warehouse) key as one atomic unit, and serialize concurrent
//! adjustments on the same key without blocking other keys.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use stockmaster_inventory::{
    AdjustStock, Adjustment, LedgerError, Movement, StockKey, StockLevel, balance_from_movements,
};

pub use in_memory::InMemoryLedgerStore;
pub use postgres::PostgresLedgerStore;

#[async_trait::async_trait]
pub trait LedgerStore: Send + Sync {
    /// Apply one adjustment atomically. Fails without side effects on
    /// `InsufficientStock`.
    async fn adjust(&self, cmd: &AdjustStock) -> Result<Adjustment, LedgerError>;

    async fn stock_level(&self, key: StockKey) -> Result<Option<StockLevel>, LedgerError>;

    /// Movements for a key, oldest first.
    async fn movements(&self, key: StockKey) -> Result<Vec<Movement>, LedgerError>;
}

#[async_trait::async_trait]
impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    async fn adjust(&self, cmd: &AdjustStock) -> Result<Adjustment, LedgerError> {
        (**self).adjust(cmd).await
    }

    async fn stock_level(&self, key: StockKey) -> Result<Option<StockLevel>, LedgerError> {
        (**self).stock_level(key).await
    }

    async fn movements(&self, key: StockKey) -> Result<Vec<Movement>, LedgerError> {
        (**self).movements(key).await
    }
}

/// Balance of a key alongside the balance its movement history implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerBalance {
    pub quantity: Decimal,
    pub derived_quantity: Decimal,
    pub movements: Vec<Movement>,
}

impl LedgerBalance {
    pub fn is_consistent(&self) -> bool {
        self.quantity == self.derived_quantity
    }
}

/// Ledger engine: the store plus logging and read helpers.
///
/// Never looks up barcodes and never publishes; callers resolve identities
/// and broadcast.
#[derive(Debug, Clone)]
pub struct StockLedger<S> {
    store: S,
}

impl<S> StockLedger<S>
where
    S: LedgerStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    #[instrument(
        skip(self, cmd),
        fields(
            product_id = %cmd.product_id,
            warehouse_id = %cmd.warehouse_id,
            kind = %cmd.kind,
            quantity_change = %cmd.quantity_change
        ),
        err
    )]
    pub async fn adjust(&self, cmd: AdjustStock) -> Result<Adjustment, LedgerError> {
        let adjustment = self.store.adjust(&cmd).await?;

        tracing::info!(
            key = %cmd.key(),
            old_quantity = %adjustment.old_quantity,
            new_quantity = %adjustment.new_quantity,
            quantity_change = %cmd.quantity_change,
            movement_id = %adjustment.movement_id,
            "stock adjusted"
        );

        Ok(adjustment)
    }

    /// Current quantity; zero when the key was never touched.
    pub async fn quantity(&self, key: StockKey) -> Result<Decimal, LedgerError> {
        Ok(self
            .store
            .stock_level(key)
            .await?
            .map(|l| l.quantity)
            .unwrap_or(Decimal::ZERO))
    }

    pub async fn movements(&self, key: StockKey) -> Result<Vec<Movement>, LedgerError> {
        self.store.movements(key).await
    }

    /// Load balance and history together for consistency checks.
    pub async fn balance(&self, key: StockKey) -> Result<LedgerBalance, LedgerError> {
        let quantity = self.quantity(key).await?;
        let movements = self.store.movements(key).await?;
        let derived_quantity = balance_from_movements(&movements);

        if quantity != derived_quantity {
            tracing::error!(
                key = %key,
                quantity = %quantity,
                derived_quantity = %derived_quantity,
                "ledger balance does not match movement history"
            );
        }

        Ok(LedgerBalance {
            quantity,
            derived_quantity,
            movements,
        })
    }
}
