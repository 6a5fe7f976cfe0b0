//! Product CRUD routes, mounted under `/api`. The `:id` segment is checked by the `ProductId` extractor.

use crate::handlers::{create, destroy, index, show, update};
use crate::openapi::openapi_json;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn product_routes(state: AppState) -> Router {
    Router::new()
        .route("/product", get(index).post(create))
        .route("/product/:id", get(show).put(update).delete(destroy))
        .route("/openapi.json", get(openapi_json))
        .with_state(state)
}
