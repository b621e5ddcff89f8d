use sqlx::PgPool;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id UUID PRIMARY KEY,
        sku TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        category TEXT,
        unit_of_measure TEXT,
        reorder_threshold NUMERIC NOT NULL DEFAULT 10,
        barcode TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS warehouses (
        id UUID PRIMARY KEY,
        code TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        location TEXT,
        warehouse_type TEXT NOT NULL,
        barcode TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS stock_levels (
        product_id UUID NOT NULL REFERENCES products(id),
        warehouse_id UUID NOT NULL REFERENCES warehouses(id),
        quantity NUMERIC NOT NULL DEFAULT 0 CHECK (quantity >= 0),
        last_updated TIMESTAMPTZ NOT NULL,
        PRIMARY KEY (product_id, warehouse_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS stock_movements (
        id UUID PRIMARY KEY,
        seq BIGSERIAL,
        product_id UUID NOT NULL REFERENCES products(id),
        warehouse_id UUID NOT NULL REFERENCES warehouses(id),
        movement_type TEXT NOT NULL,
        quantity_change NUMERIC NOT NULL,
        quantity NUMERIC NOT NULL,
        reason TEXT,
        actor TEXT,
        device_id TEXT,
        created_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS stock_movements_key_idx
        ON stock_movements (product_id, warehouse_id, seq)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS scan_logs (
        id UUID PRIMARY KEY,
        seq BIGSERIAL,
        barcode TEXT NOT NULL,
        symbology TEXT,
        device_id TEXT,
        actor TEXT,
        action TEXT NOT NULL,
        product_id UUID,
        warehouse_id UUID,
        quantity NUMERIC,
        success BOOLEAN NOT NULL,
        error_message TEXT,
        scanned_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS scan_logs_seq_idx ON scan_logs (seq DESC)
    "#,
];

/// Create all tables and indexes if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::info!(tables = 5, "database schema ensured");
    Ok(())
}
