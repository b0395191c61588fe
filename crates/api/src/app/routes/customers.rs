use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, routing::get, Json, Router};

use pharmacy_infra::projections;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/customers", get(list_customers))
}

/// Customers derived from sales history, most recent buyer first.
pub async fn list_customers(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.with_store(|store| projections::aggregate_customers(store.sales())) {
        Ok(customers) => Json(customers).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
