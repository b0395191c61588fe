//! HTTP application wiring (axum router + shared store).
//!
//! - `services.rs`: the locked store shared by handlers
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: query and response shapes
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use pharmacy_core::DomainResult;

use crate::config::ApiConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> DomainResult<Router> {
    let services = Arc::new(services::AppServices::new(config.seed)?);
    Ok(router(services))
}

/// Router over an existing set of services.
pub fn router(services: Arc<services::AppServices>) -> Router {
    routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(middleware::request_trace))
            .layer(Extension(services)),
    )
}
