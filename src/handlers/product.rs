//! Product handlers: index, create, show, update, destroy.
//! Each handler turns the request into explicit arguments for `ProductService`.

use crate::error::AppError;
use crate::extractors::ProductId;
use crate::response::{created, ok, ProductPage, ProductResource};
use crate::service::{ProductInput, ProductService};
use crate::state::AppState;
use crate::store::PageRequest;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.trim_start().starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

/// Reads a create/update body as field map. Empty bodies and non-object JSON (arrays, scalars)
/// give an empty map so validation reports the missing fields. Only unparseable JSON is a 400.
fn body_to_map(headers: &HeaderMap, body: &[u8]) -> Result<Map<String, Value>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    if is_form(headers) {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
            .map_err(|e| AppError::BadRequest(format!("invalid form body: {}", e)))?;
        return Ok(pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect());
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(m)) => Ok(m),
        Ok(_) => Ok(Map::new()),
        Err(e) => Err(AppError::BadRequest(format!("invalid JSON body: {}", e))),
    }
}

/// Missing, non-numeric, or zero `page` falls back to the first page.
fn page_param(params: &HashMap<String, String>) -> u64 {
    params
        .get("page")
        .and_then(|p| p.trim().parse::<u64>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

#[utoipa::path(
    get,
    path = "/api/product",
    tag = "product",
    params(("page" = Option<u64>, Query, description = "1-based page number")),
    responses((status = 200, description = "One page of products", body = ProductPage))
)]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let request = PageRequest::new(page_param(&params), state.config.per_page);
    let page = ProductService::new(state.store.as_ref())
        .index(request, &state.config.products_url())
        .await?;
    Ok(ok(page))
}

#[utoipa::path(
    post,
    path = "/api/product",
    tag = "product",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created", body = ProductResource),
        (status = 422, description = "Missing, invalid, or duplicate fields")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(&headers, &body)?;
    let product = ProductService::new(state.store.as_ref()).create(&body).await?;
    Ok(created(ProductResource::from(product)))
}

#[utoipa::path(
    get,
    path = "/api/product/{id}",
    tag = "product",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = ProductResource),
        (status = 404, description = "No product with this id")
    )
)]
pub async fn show(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> Result<impl IntoResponse, AppError> {
    let product = ProductService::new(state.store.as_ref()).show(id).await?;
    Ok(ok(ProductResource::from(product)))
}

#[utoipa::path(
    put,
    path = "/api/product/{id}",
    tag = "product",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductInput,
    responses(
        (status = 200, description = "Updated product", body = ProductResource),
        (status = 404, description = "No product with this id"),
        (status = 422, description = "Missing or invalid fields")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    ProductId(id): ProductId,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(&headers, &body)?;
    let product = ProductService::new(state.store.as_ref()).update(id, &body).await?;
    Ok(ok(ProductResource::from(product)))
}

#[utoipa::path(
    delete,
    path = "/api/product/{id}",
    tag = "product",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "No product with this id")
    )
)]
pub async fn destroy(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> Result<impl IntoResponse, AppError> {
    ProductService::new(state.store.as_ref()).destroy(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn page_param_defaults_to_first_page() {
        assert_eq!(page_param(&params(&[])), 1);
        assert_eq!(page_param(&params(&[("page", "0")])), 1);
        assert_eq!(page_param(&params(&[("page", "-3")])), 1);
        assert_eq!(page_param(&params(&[("page", "two")])), 1);
        assert_eq!(page_param(&params(&[("page", "2")])), 2);
    }

    fn headers(content_type: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::CONTENT_TYPE, content_type.parse().unwrap());
        h
    }

    #[test]
    fn empty_and_non_object_bodies_become_empty() {
        let json = headers("application/json");
        assert!(body_to_map(&json, b"").unwrap().is_empty());
        assert!(body_to_map(&HeaderMap::new(), b"  \n").unwrap().is_empty());
        assert!(body_to_map(&json, b"[]").unwrap().is_empty());
        assert!(body_to_map(&json, b"\"\"").unwrap().is_empty());
        let m = body_to_map(&json, br#"{"name": "x"}"#).unwrap();
        assert_eq!(m.get("name"), Some(&Value::from("x")));
    }

    #[test]
    fn form_bodies_become_string_fields() {
        let form = headers("application/x-www-form-urlencoded; charset=UTF-8");
        let m = body_to_map(&form, b"name=Crepe+Suzette&price=12").unwrap();
        assert_eq!(m.get("name"), Some(&Value::from("Crepe Suzette")));
        assert_eq!(m.get("price"), Some(&Value::from("12")));
    }

    #[test]
    fn unparseable_json_is_a_bad_request() {
        assert!(matches!(
            body_to_map(&headers("application/json"), b"{\"name\": "),
            Err(AppError::BadRequest(_))
        ));
    }
}
