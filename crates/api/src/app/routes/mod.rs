use axum::{routing::get, Router};

pub mod auth;
pub mod inventory;
pub mod parts;
pub mod sales;
pub mod stores;
pub mod system;

/// Router for all authenticated endpoints (mounted under `/api`).
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/parts", parts::router())
        .nest("/stores", stores::router())
        .nest("/inventory", inventory::router())
        .nest("/sales", sales::router())
}
