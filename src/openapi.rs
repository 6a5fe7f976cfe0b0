//! OpenAPI document for the product endpoints, served at `GET /api/openapi.json`.

use crate::handlers::product;
use crate::response::{PageLinks, PageMeta, ProductPage, ProductResource};
use crate::service::ProductInput;
use crate::store::Product;
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(product::index, product::create, product::show, product::update, product::destroy),
    components(schemas(Product, ProductResource, ProductInput, ProductPage, PageLinks, PageMeta)),
    tags((name = "product", description = "Product CRUD"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
