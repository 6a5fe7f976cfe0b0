//! Extract a product id from the `:id` path segment.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// Product id from the path. Only a non-empty run of ASCII digits that fits in
/// `i64` is accepted; anything else is rejected as 404, the same as an
/// unmatched route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProductId(pub i64);

impl ProductId {
    pub fn parse(segment: &str) -> Option<Self> {
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        segment.parse().ok().map(ProductId)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ProductId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(segment) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound("product".into()))?;
        ProductId::parse(&segment).ok_or_else(|| AppError::NotFound(format!("product '{}'", segment)))
    }
}
