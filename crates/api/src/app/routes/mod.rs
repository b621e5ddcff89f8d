use axum::{routing::get, Router};

pub mod scan;
pub mod scanner;
pub mod stock;
pub mod stream;
pub mod system;

pub fn router() -> Router {
    Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .nest("/scan", scan::router())
        .nest("/stock", stock::router())
        .nest("/scanner", scanner::router())
        .nest("/stream", stream::router())
}
