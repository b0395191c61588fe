use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use pharmacy_core::{DomainError, SaleId};
use pharmacy_infra::projections;
use pharmacy_sales::{OrderRequest, Sale};

use crate::app::routes::common::{extracted, parse_id};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/sales", get(list_sales))
        .route("/sales/process-order", post(process_order))
        .route("/sales/:id", get(get_sale).delete(delete_sale))
}

pub async fn list_sales(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::SalesQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match extracted(query) {
        Ok(q) => q,
        Err(resp) => return resp,
    };

    let sales: Vec<Sale> = services.with_store(|store| match query.order {
        dto::SalesOrder::Oldest => store.sales().cloned().collect(),
        dto::SalesOrder::Newest => projections::newest_first(store.sales()),
    });

    Json(sales).into_response()
}

pub async fn get_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: SaleId = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.with_store(|store| store.sale(id).cloned()) {
        Some(sale) => Json(sale).into_response(),
        None => errors::domain_error_to_response(DomainError::not_found(format!("sale {id}"))),
    }
}

pub async fn process_order(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<OrderRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(request) = match extracted(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    let now = Utc::now();
    match services.with_store(|store| store.process_order(request, now)) {
        Ok(sale) => (StatusCode::CREATED, Json(dto::ProcessOrderResponse::new(sale))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Delete a sale and put its quantities back on the shelf.
pub async fn delete_sale(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: SaleId = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.with_store(|store| store.reverse_sale(id)) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
