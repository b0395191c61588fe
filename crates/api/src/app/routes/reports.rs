use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use pharmacy_inventory::LOW_STOCK_THRESHOLD;
use pharmacy_infra::projections::{self, Dashboard};

use crate::app::routes::common::extracted;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/reports/dashboard", get(dashboard))
        .route("/reports/low-stock", get(low_stock))
        .route("/reports/revenue", get(revenue))
}

pub async fn dashboard(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let now = Utc::now();
    match services.with_store(|store| Dashboard::compute(store.medicines(), store.sales(), now)) {
        Ok(dashboard) => Json(dashboard).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn low_stock(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    let low = services.with_store(|store| projections::low_stock(store.medicines(), LOW_STOCK_THRESHOLD));
    Json(low).into_response()
}

pub async fn revenue(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::RevenueQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match extracted(query) {
        Ok(q) => q,
        Err(resp) => return resp,
    };

    let days = match query.days {
        Some(days) if days >= 0 => days,
        Some(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "days must not be negative");
        }
        None => return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "days is required"),
    };

    let now = Utc::now();
    match services.with_store(|store| projections::period_revenue(store.sales(), days, now)) {
        Ok(revenue) => Json(dto::RevenueResponse { days, revenue }).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
