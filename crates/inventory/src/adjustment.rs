use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockmaster_core::{MovementId, ProductId, WarehouseId};

use crate::error::LedgerError;
use crate::level::{StockKey, StockLevel};
use crate::movement::{Movement, MovementKind};

/// Command: AdjustStock.
///
/// `quantity_change` is signed: positive increases the balance, negative
/// decreases it. Zero is accepted and recorded as a confirmed no-op movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustStock {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub quantity_change: Decimal,
    pub kind: MovementKind,
    pub reason: Option<String>,
    pub actor: Option<String>,
    pub device_id: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl AdjustStock {
    pub fn new(
        product_id: ProductId,
        warehouse_id: WarehouseId,
        quantity_change: Decimal,
        kind: MovementKind,
    ) -> Self {
        Self {
            product_id,
            warehouse_id,
            quantity_change,
            kind,
            reason: None,
            actor: None,
            device_id: None,
            occurred_at: Utc::now(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn by(mut self, actor: Option<String>) -> Self {
        self.actor = actor;
        self
    }

    pub fn on_device(mut self, device_id: Option<String>) -> Self {
        self.device_id = device_id;
        self
    }

    pub fn at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = occurred_at;
        self
    }

    pub fn key(&self) -> StockKey {
        StockKey::new(self.product_id, self.warehouse_id)
    }
}

/// Result of a committed adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub old_quantity: Decimal,
    pub new_quantity: Decimal,
    pub movement_id: MovementId,
}

/// The writes a store must apply together for one adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAdjustment {
    pub old_quantity: Decimal,
    pub level: StockLevel,
    pub movement: Movement,
}

impl PlannedAdjustment {
    pub fn outcome(&self) -> Adjustment {
        Adjustment {
            old_quantity: self.old_quantity,
            new_quantity: self.level.quantity,
            movement_id: self.movement.id,
        }
    }
}

/// Decide the new balance and movement for `cmd` against the current level.
///
/// Fails with `InsufficientStock` when the balance would go negative and with
/// `QuantityOverflow` when it would leave the decimal range.
pub fn plan_adjustment(
    current: Option<&StockLevel>,
    cmd: &AdjustStock,
    movement_id: MovementId,
) -> Result<PlannedAdjustment, LedgerError> {
    let old_quantity = current.map(|l| l.quantity).unwrap_or(Decimal::ZERO);
    let new_quantity = old_quantity.checked_add(cmd.quantity_change).ok_or(
        LedgerError::QuantityOverflow {
            available: old_quantity,
            change: cmd.quantity_change,
        },
    )?;

    if new_quantity < Decimal::ZERO {
        return Err(LedgerError::InsufficientStock {
            available: old_quantity,
            requested: -cmd.quantity_change,
        });
    }

    let level = StockLevel {
        product_id: cmd.product_id,
        warehouse_id: cmd.warehouse_id,
        quantity: new_quantity,
        last_updated: cmd.occurred_at,
    };

    let movement = Movement {
        id: movement_id,
        product_id: cmd.product_id,
        warehouse_id: cmd.warehouse_id,
        kind: cmd.kind,
        quantity_change: cmd.quantity_change,
        quantity: cmd.quantity_change.abs(),
        reason: cmd.reason.clone(),
        actor: cmd.actor.clone(),
        device_id: cmd.device_id.clone(),
        created_at: cmd.occurred_at,
    };

    Ok(PlannedAdjustment {
        old_quantity,
        level,
        movement,
    })
}

/// Running sum of movement changes: the balance the history implies.
pub fn balance_from_movements(movements: &[Movement]) -> Decimal {
    movements.iter().map(|m| m.quantity_change).sum()
}
