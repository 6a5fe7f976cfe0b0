//! Product persistence: the `ProductStore` seam plus PostgreSQL and in-memory adapters.

mod memory;
mod postgres;

pub use memory::MemoryProductStore;
pub use postgres::{ensure_database_exists, PgProductStore};

use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// A stored product row. `slug` always mirrors the most recently written `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub price: i64,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const NAME_MAX_CHARS: usize = 255;

/// Writable fields for create and update. The slug is derived by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub name: String,
    pub price: i64,
}

impl ProductFields {
    /// Stores run this before every write: the name must be non-blank and at most
    /// `NAME_MAX_CHARS` characters (not bytes).
    pub fn check_name(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        let chars = self.name.chars().count();
        if chars > NAME_MAX_CHARS {
            return Err(StoreError::NameTooLong(chars));
        }
        Ok(())
    }
}

/// 1-based page selection for listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    /// Page and page size below 1 are raised to 1.
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Number of rows preceding this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

/// One page of rows plus the total row count across all pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Storage operations for products. Implementations keep rows ordered by id, reject
/// blank or over-long names (`ProductFields::check_name`), and enforce unique names at
/// write time (`StoreError::DuplicateName`).
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn create(&self, fields: ProductFields) -> Result<Product, StoreError>;

    async fn find(&self, id: i64) -> Result<Option<Product>, StoreError>;

    /// Returns `None` when no row has this id.
    async fn update(&self, id: i64, fields: ProductFields) -> Result<Option<Product>, StoreError>;

    /// Returns `false` when no row has this id.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    async fn list(&self, page: PageRequest) -> Result<Page<Product>, StoreError>;

    async fn name_exists(&self, name: &str) -> Result<bool, StoreError>;

    /// Cheap liveness probe used by the readiness route.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::{PageRequest, ProductFields};
    use crate::error::StoreError;

    #[test]
    fn page_request_clamps_and_offsets() {
        assert_eq!(PageRequest::new(0, 0), PageRequest { page: 1, per_page: 1 });
        assert_eq!(PageRequest::new(1, 15).offset(), 0);
        assert_eq!(PageRequest::new(3, 15).offset(), 30);
        assert_eq!(PageRequest::new(u64::MAX, 15).offset(), u64::MAX);
    }

    #[test]
    fn check_name_rejects_blank_and_long_names() {
        let fields = |name: String| ProductFields { name, price: 1 };
        assert!(matches!(fields("  ".into()).check_name(), Err(StoreError::EmptyName)));
        assert!(matches!(fields("x".repeat(256)).check_name(), Err(StoreError::NameTooLong(256))));
        assert!(fields("é".repeat(255)).check_name().is_ok());
    }
}
