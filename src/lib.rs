//! Product API: REST CRUD for products backed by PostgreSQL, with slugged names and paginated listing.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod slug;
pub mod state;
pub mod store;

pub use config::{AppConfig, StoreBackend};
pub use error::{AppError, ConfigError, FieldErrors, StoreError};
pub use migration::apply_migrations;
pub use routes::{common_routes, common_routes_with_ready, product_routes};
pub use service::ProductService;
pub use crate::slug::slugify;
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryProductStore, PgProductStore, Product, ProductStore};

use axum::{http::HeaderName, Router};
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Full application router: common routes at the root, product routes under `/api`,
/// wrapped in request-id, tracing, and body-limit layers.
pub fn app(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let body_limit = state.config.body_limit;
    Router::new()
        .merge(common_routes_with_ready(state.clone()))
        .nest("/api", product_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(RequestBodyLimitLayer::new(body_limit)),
        )
}
