//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection, ledger engine, scan router, session registry
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::config::AppConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(config).await?);
    Ok(build_app_with(services))
}

/// Router over already-built services. Tests use this to keep a handle on the stores.
pub fn build_app_with(services: Arc<AppServices>) -> Router {
    routes::router()
        .layer(Extension(services))
        .layer(ServiceBuilder::new())
}
