use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use pharmacy_core::{DomainError, MedicineId};
use pharmacy_inventory::{Medicine, MedicinePatch, NewMedicine};

use crate::app::routes::common::{extracted, parse_id};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/medicines", get(list_medicines).post(create_medicine))
        .route(
            "/medicines/:id",
            get(get_medicine).put(update_medicine).delete(delete_medicine),
        )
}

pub async fn list_medicines(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::MedicineQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match extracted(query) {
        Ok(q) => q,
        Err(resp) => return resp,
    };

    let medicines: Vec<Medicine> = services.with_store(|store| {
        if query.is_filtered() {
            store
                .search_medicines(query.search_term().unwrap_or_default(), query.in_stock)
                .into_iter()
                .cloned()
                .collect()
        } else {
            store.medicines().cloned().collect()
        }
    });

    Json(medicines).into_response()
}

pub async fn get_medicine(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: MedicineId = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.with_store(|store| store.medicine(id).cloned()) {
        Some(medicine) => Json(medicine).into_response(),
        None => errors::domain_error_to_response(DomainError::not_found(format!("medicine {id}"))),
    }
}

pub async fn create_medicine(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<NewMedicine>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match extracted(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services.with_store(|store| store.add_medicine(body)) {
        Ok(medicine) => (StatusCode::CREATED, Json(medicine)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_medicine(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<MedicinePatch>, JsonRejection>,
) -> axum::response::Response {
    let id: MedicineId = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Json(patch) = match extracted(body) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services.with_store(|store| store.update_medicine(id, patch)) {
        Ok(medicine) => Json(medicine).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Always 204; deleting an unknown medicine is a no-op.
pub async fn delete_medicine(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: MedicineId = match parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    services.with_store(|store| store.delete_medicine(id));
    StatusCode::NO_CONTENT.into_response()
}
