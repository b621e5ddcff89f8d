use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use stockmaster_core::MovementId;
use stockmaster_inventory::{
    AdjustStock, Adjustment, LedgerError, Movement, StockKey, StockLevel, plan_adjustment,
};

use super::LedgerStore;

#[derive(Debug, Default)]
struct KeyLedger {
    level: Option<StockLevel>,
    movements: Vec<Movement>,
}

/// In-memory ledger with one mutex per (product, warehouse) key.
///
/// The key map lock is only held to fetch or create a key's cell, so
/// adjustments on different keys never wait on each other.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    keys: RwLock<HashMap<StockKey, Arc<Mutex<KeyLedger>>>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_count(&self) -> usize {
        self.keys.read().map(|k| k.len()).unwrap_or(0)
    }

    fn cell(&self, key: StockKey) -> Result<Arc<Mutex<KeyLedger>>, LedgerError> {
        {
            let keys = self
                .keys
                .read()
                .map_err(|_| LedgerError::storage("ledger key map lock poisoned"))?;
            if let Some(cell) = keys.get(&key) {
                return Ok(cell.clone());
            }
        }

        let mut keys = self
            .keys
            .write()
            .map_err(|_| LedgerError::storage("ledger key map lock poisoned"))?;
        Ok(keys.entry(key).or_default().clone())
    }

    fn existing_cell(&self, key: StockKey) -> Result<Option<Arc<Mutex<KeyLedger>>>, LedgerError> {
        let keys = self
            .keys
            .read()
            .map_err(|_| LedgerError::storage("ledger key map lock poisoned"))?;
        Ok(keys.get(&key).cloned())
    }
}

#[async_trait::async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn adjust(&self, cmd: &AdjustStock) -> Result<Adjustment, LedgerError> {
        let cell = self.cell(cmd.key())?;
        let mut ledger = cell
            .lock()
            .map_err(|_| LedgerError::storage("ledger key lock poisoned"))?;

        let plan = plan_adjustment(ledger.level.as_ref(), cmd, MovementId::new())?;
        let outcome = plan.outcome();
        ledger.level = Some(plan.level);
        ledger.movements.push(plan.movement);
        Ok(outcome)
    }

    async fn stock_level(&self, key: StockKey) -> Result<Option<StockLevel>, LedgerError> {
        let Some(cell) = self.existing_cell(key)? else {
            return Ok(None);
        };
        let ledger = cell
            .lock()
            .map_err(|_| LedgerError::storage("ledger key lock poisoned"))?;
        Ok(ledger.level.clone())
    }

    async fn movements(&self, key: StockKey) -> Result<Vec<Movement>, LedgerError> {
        let Some(cell) = self.existing_cell(key)? else {
            return Ok(Vec::new());
        };
        let ledger = cell
            .lock()
            .map_err(|_| LedgerError::storage("ledger key lock poisoned"))?;
        Ok(ledger.movements.clone())
    }
}
