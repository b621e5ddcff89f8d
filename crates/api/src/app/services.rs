//! Service wiring: stores, ledger engine, router, session registry, broadcaster.

use std::sync::Arc;

use anyhow::Context;

use stockmaster_events::{EventEnvelope, InMemoryEventBus};
use stockmaster_infra::{
    CatalogStore, DemoCatalog, InMemoryCatalog, InMemoryLedgerStore, InMemoryScanLog, LedgerStore,
    PostgresCatalog, PostgresLedgerStore, PostgresScanLog, ScanLogStore, ScanRouter,
    ScannerSessionManager, StockLedger, postgres, seed_demo,
};
use stockmaster_scanning::ScanOutcome;

use crate::config::AppConfig;

/// Live broadcaster: one unbounded channel per SSE observer.
pub type ScanBus = InMemoryEventBus<EventEnvelope<ScanOutcome>>;

pub type AppRouter =
    ScanRouter<Arc<dyn CatalogStore>, Arc<dyn LedgerStore>, Arc<dyn ScanLogStore>, Arc<ScanBus>>;

const POSTGRES_MAX_CONNECTIONS: u32 = 10;

pub struct AppServices {
    pub catalog: Arc<dyn CatalogStore>,
    pub ledger: StockLedger<Arc<dyn LedgerStore>>,
    pub scan_log: Arc<dyn ScanLogStore>,
    pub bus: Arc<ScanBus>,
    pub router: AppRouter,
    pub sessions: ScannerSessionManager,
    pub history_limit: usize,
    pub backend: &'static str,
    /// Seeded demo data, when the in-memory backend was seeded.
    pub demo: Option<DemoCatalog>,
}

impl AppServices {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        ledger_store: Arc<dyn LedgerStore>,
        scan_log: Arc<dyn ScanLogStore>,
        history_limit: usize,
        backend: &'static str,
    ) -> Self {
        let bus: Arc<ScanBus> = Arc::new(InMemoryEventBus::new());
        let router = ScanRouter::new(
            catalog.clone(),
            StockLedger::new(ledger_store.clone()),
            scan_log.clone(),
            bus.clone(),
        );

        Self {
            catalog,
            ledger: StockLedger::new(ledger_store),
            scan_log,
            bus,
            router,
            sessions: ScannerSessionManager::new(),
            history_limit,
            backend,
            demo: None,
        }
    }

    /// In-memory stores (dev/test), optionally seeded with the demo catalog.
    pub async fn in_memory(seed: bool, history_limit: usize) -> anyhow::Result<Self> {
        let mut services = Self::new(
            Arc::new(InMemoryCatalog::new()),
            Arc::new(InMemoryLedgerStore::new()),
            Arc::new(InMemoryScanLog::new()),
            history_limit,
            "in_memory",
        );

        if seed {
            let demo = seed_demo(services.catalog.as_ref(), &services.ledger)
                .await
                .context("failed to seed demo data")?;
            services.demo = Some(demo);
        }

        Ok(services)
    }

    pub async fn postgres(database_url: &str, history_limit: usize) -> anyhow::Result<Self> {
        let pool = postgres::connect(database_url, POSTGRES_MAX_CONNECTIONS)
            .await
            .context("failed to connect to Postgres")?;
        postgres::ensure_schema(&pool)
            .await
            .context("failed to create database schema")?;

        Ok(Self::new(
            Arc::new(PostgresCatalog::new(pool.clone())),
            Arc::new(PostgresLedgerStore::new(pool.clone())),
            Arc::new(PostgresScanLog::new(pool)),
            history_limit,
            "postgres",
        ))
    }
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.database_url {
        Some(url) => {
            if config.seed_demo {
                tracing::info!("demo seeding only applies to the in-memory backend; skipping");
            }
            AppServices::postgres(url, config.history_limit).await
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            AppServices::in_memory(config.seed_demo, config.history_limit).await
        }
    }
}
