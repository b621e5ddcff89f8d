//! Postgres-backed ledger store.
//!
//! One transaction per `adjust`:
//!
//! 1. `INSERT ... ON CONFLICT DO NOTHING` guarantees the key's row exists
//! 2. `SELECT ... FOR UPDATE` takes the row lock, serializing writers on the key
//! 3. the adjustment is planned in Rust; `InsufficientStock` rolls back
//! 4. `UPDATE stock_levels` and `INSERT INTO stock_movements`
//! 5. commit
//!
//! Every sqlx failure maps to `LedgerError::StorageUnavailable`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use stockmaster_core::{MovementId, ProductId, WarehouseId};
use stockmaster_inventory::{
    AdjustStock, Adjustment, LedgerError, Movement, MovementKind, StockKey, StockLevel,
    plan_adjustment,
};

use super::LedgerStore;
use crate::postgres::describe;

#[derive(Debug, Clone)]
pub struct PostgresLedgerStore {
    pool: Arc<PgPool>,
}

impl PostgresLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> LedgerError {
    LedgerError::StorageUnavailable(describe(operation, &err))
}

fn movement_from_row(row: &PgRow) -> Result<Movement, LedgerError> {
    let read = |e: sqlx::Error| map_sqlx_error("decode_movement", e);

    let kind: String = row.try_get("movement_type").map_err(read)?;
    let kind: MovementKind = kind
        .parse()
        .map_err(|e| LedgerError::storage(format!("invalid movement row: {e}")))?;

    Ok(Movement {
        id: MovementId::from_uuid(row.try_get("id").map_err(read)?),
        product_id: ProductId::from_uuid(row.try_get("product_id").map_err(read)?),
        warehouse_id: WarehouseId::from_uuid(row.try_get("warehouse_id").map_err(read)?),
        kind,
        quantity_change: row.try_get("quantity_change").map_err(read)?,
        quantity: row.try_get("quantity").map_err(read)?,
        reason: row.try_get("reason").map_err(read)?,
        actor: row.try_get("actor").map_err(read)?,
        device_id: row.try_get("device_id").map_err(read)?,
        created_at: row.try_get("created_at").map_err(read)?,
    })
}

#[async_trait::async_trait]
impl LedgerStore for PostgresLedgerStore {
    #[instrument(
        skip(self, cmd),
        fields(product_id = %cmd.product_id, warehouse_id = %cmd.warehouse_id),
        err
    )]
    async fn adjust(&self, cmd: &AdjustStock) -> Result<Adjustment, LedgerError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO stock_levels (product_id, warehouse_id, quantity, last_updated)
            VALUES ($1, $2, 0, $3)
            ON CONFLICT (product_id, warehouse_id) DO NOTHING
            "#,
        )
        .bind(cmd.product_id.as_uuid())
        .bind(cmd.warehouse_id.as_uuid())
        .bind(cmd.occurred_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("ensure_stock_level", e))?;

        let row = sqlx::query(
            r#"
            SELECT quantity, last_updated
            FROM stock_levels
            WHERE product_id = $1 AND warehouse_id = $2
            FOR UPDATE
            "#,
        )
        .bind(cmd.product_id.as_uuid())
        .bind(cmd.warehouse_id.as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("lock_stock_level", e))?;

        let quantity: Decimal = row
            .try_get("quantity")
            .map_err(|e| map_sqlx_error("decode_stock_level", e))?;
        let last_updated: DateTime<Utc> = row
            .try_get("last_updated")
            .map_err(|e| map_sqlx_error("decode_stock_level", e))?;
        let current = StockLevel {
            product_id: cmd.product_id,
            warehouse_id: cmd.warehouse_id,
            quantity,
            last_updated,
        };

        let plan = match plan_adjustment(Some(&current), cmd, MovementId::new()) {
            Ok(plan) => plan,
            Err(err) => {
                tx.rollback()
                    .await
                    .map_err(|e| map_sqlx_error("rollback", e))?;
                return Err(err);
            }
        };

        sqlx::query(
            r#"
            UPDATE stock_levels
            SET quantity = $3, last_updated = $4
            WHERE product_id = $1 AND warehouse_id = $2
            "#,
        )
        .bind(cmd.product_id.as_uuid())
        .bind(cmd.warehouse_id.as_uuid())
        .bind(plan.level.quantity)
        .bind(plan.level.last_updated)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_stock_level", e))?;

        let m = &plan.movement;
        sqlx::query(
            r#"
            INSERT INTO stock_movements (
                id,
                product_id,
                warehouse_id,
                movement_type,
                quantity_change,
                quantity,
                reason,
                actor,
                device_id,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(m.id.as_uuid())
        .bind(m.product_id.as_uuid())
        .bind(m.warehouse_id.as_uuid())
        .bind(m.kind.as_str())
        .bind(m.quantity_change)
        .bind(m.quantity)
        .bind(m.reason.as_deref())
        .bind(m.actor.as_deref())
        .bind(m.device_id.as_deref())
        .bind(m.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_movement", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(plan.outcome())
    }

    #[instrument(skip(self), fields(key = %key), err)]
    async fn stock_level(&self, key: StockKey) -> Result<Option<StockLevel>, LedgerError> {
        let row = sqlx::query(
            r#"
            SELECT quantity, last_updated
            FROM stock_levels
            WHERE product_id = $1 AND warehouse_id = $2
            "#,
        )
        .bind(key.product_id.as_uuid())
        .bind(key.warehouse_id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("stock_level", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(StockLevel {
            product_id: key.product_id,
            warehouse_id: key.warehouse_id,
            quantity: row
                .try_get("quantity")
                .map_err(|e| map_sqlx_error("decode_stock_level", e))?,
            last_updated: row
                .try_get("last_updated")
                .map_err(|e| map_sqlx_error("decode_stock_level", e))?,
        }))
    }

    #[instrument(skip(self), fields(key = %key), err)]
    async fn movements(&self, key: StockKey) -> Result<Vec<Movement>, LedgerError> {
        let rows = sqlx::query(
            r#"
            SELECT
                id,
                product_id,
                warehouse_id,
                movement_type,
                quantity_change,
                quantity,
                reason,
                actor,
                device_id,
                created_at
            FROM stock_movements
            WHERE product_id = $1 AND warehouse_id = $2
            ORDER BY seq ASC
            "#,
        )
        .bind(key.product_id.as_uuid())
        .bind(key.warehouse_id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("movements", e))?;

        rows.iter().map(movement_from_row).collect()
    }
}
