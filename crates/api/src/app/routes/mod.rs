use axum::{routing::get, Router};

pub mod common;
pub mod customers;
pub mod medicines;
pub mod reports;
pub mod sales;
pub mod system;

/// Router for every endpoint.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .merge(medicines::router())
        .merge(sales::router())
        .merge(reports::router())
        .merge(customers::router())
}
