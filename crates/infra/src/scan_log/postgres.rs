use std::sync::Arc;

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use stockmaster_core::{ProductId, ScanLogId, WarehouseId};
use stockmaster_scanning::{ScanAction, ScanHistoryQuery, ScanLogEntry, Symbology};

use super::ScanLogStore;
use crate::error::StoreError;
use crate::postgres::describe;

/// Postgres-backed scan log. History order follows insertion (`seq`).
#[derive(Debug, Clone)]
pub struct PostgresScanLog {
    pool: Arc<PgPool>,
}

impl PostgresScanLog {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(describe(operation, &err))
}

fn entry_from_row(row: &PgRow) -> Result<ScanLogEntry, StoreError> {
    let read = |e: sqlx::Error| map_sqlx_error("decode_scan_log", e);

    let action: String = row.try_get("action").map_err(read)?;
    let action: ScanAction = action
        .parse()
        .map_err(|e| StoreError::unavailable(format!("invalid scan log row: {e}")))?;
    let symbology: Option<String> = row.try_get("symbology").map_err(read)?;
    let product_id: Option<uuid::Uuid> = row.try_get("product_id").map_err(read)?;
    let warehouse_id: Option<uuid::Uuid> = row.try_get("warehouse_id").map_err(read)?;

    Ok(ScanLogEntry {
        id: ScanLogId::from_uuid(row.try_get("id").map_err(read)?),
        barcode: row.try_get("barcode").map_err(read)?,
        symbology: symbology.as_deref().map(Symbology::from),
        device_id: row.try_get("device_id").map_err(read)?,
        actor: row.try_get("actor").map_err(read)?,
        action,
        product_id: product_id.map(ProductId::from_uuid),
        warehouse_id: warehouse_id.map(WarehouseId::from_uuid),
        quantity: row.try_get("quantity").map_err(read)?,
        success: row.try_get("success").map_err(read)?,
        error_message: row.try_get("error_message").map_err(read)?,
        scanned_at: row.try_get("scanned_at").map_err(read)?,
    })
}

#[async_trait::async_trait]
impl ScanLogStore for PostgresScanLog {
    #[instrument(skip(self, entry), fields(scan_id = %entry.id, action = %entry.action), err)]
    async fn append(&self, entry: &ScanLogEntry) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO scan_logs (
                id,
                barcode,
                symbology,
                device_id,
                actor,
                action,
                product_id,
                warehouse_id,
                quantity,
                success,
                error_message,
                scanned_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(&entry.barcode)
        .bind(entry.symbology.map(|s| s.as_str()))
        .bind(entry.device_id.as_deref())
        .bind(entry.actor.as_deref())
        .bind(entry.action.as_str())
        .bind(entry.product_id.map(|id| *id.as_uuid()))
        .bind(entry.warehouse_id.map(|id| *id.as_uuid()))
        .bind(entry.quantity)
        .bind(entry.success)
        .bind(entry.error_message.as_deref())
        .bind(entry.scanned_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("append_scan_log", e))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn history(&self, query: &ScanHistoryQuery) -> Result<Vec<ScanLogEntry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                id,
                barcode,
                symbology,
                device_id,
                actor,
                action,
                product_id,
                warehouse_id,
                quantity,
                success,
                error_message,
                scanned_at
            FROM scan_logs
            WHERE ($1::uuid IS NULL OR product_id = $1)
                AND ($2::uuid IS NULL OR warehouse_id = $2)
            ORDER BY seq DESC
            LIMIT $3
            "#,
        )
        .bind(query.product_id.map(|id| *id.as_uuid()))
        .bind(query.warehouse_id.map(|id| *id.as_uuid()))
        .bind(query.limit as i64)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("scan_history", e))?;

        rows.iter().map(entry_from_row).collect()
    }
}
