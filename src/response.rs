//! Response shapes: the single-product resource and the paginated list envelope.

use crate::store::{Page, PageRequest, Product};
use axum::{http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Product as returned by create, show, and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProductResource {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductResource {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            slug: p.slug,
            price: p.price,
            image: p.image,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageLinks {
    pub first: String,
    pub last: String,
    pub next: Option<String>,
    pub prev: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageMeta {
    pub current_page: u64,
    /// 1-based position of the first item on this page; null when the page is empty.
    pub from: Option<u64>,
    pub last_page: u64,
    pub path: String,
    pub per_page: u64,
    pub to: Option<u64>,
    pub total: u64,
}

/// `GET /api/product` body: one page of full product rows plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProductPage {
    pub data: Vec<Product>,
    pub links: PageLinks,
    pub meta: PageMeta,
}

impl ProductPage {
    /// `path` is the absolute collection URL; links append `?page=N` to it.
    pub fn new(page: Page<Product>, request: PageRequest, path: &str) -> Self {
        let current = request.page;
        let per_page = request.per_page.max(1);
        let last_page = page.total.div_ceil(per_page).max(1);
        let count = page.items.len() as u64;
        let (from, to) = if count == 0 {
            (None, None)
        } else {
            let from = request.offset().saturating_add(1);
            (Some(from), Some(from.saturating_add(count - 1)))
        };
        let link = |n: u64| format!("{}?page={}", path, n);
        Self {
            data: page.items,
            links: PageLinks {
                first: link(1),
                last: link(last_page),
                next: (current < last_page).then(|| link(current + 1)),
                prev: (current > 1).then(|| link(current - 1)),
            },
            meta: PageMeta {
                current_page: current,
                from,
                last_page,
                path: path.to_string(),
                per_page,
                to,
                total: page.total,
            },
        }
    }
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}
