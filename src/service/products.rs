//! Product operations against any `ProductStore`.

use super::validation::{ProductValidator, NAME_TAKEN};
use crate::error::{AppError, FieldErrors};
use crate::response::ProductPage;
use crate::store::{PageRequest, Product, ProductStore};
use serde_json::{Map, Value};

pub struct ProductService<'a> {
    store: &'a dyn ProductStore,
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("product {}", id))
}

impl<'a> ProductService<'a> {
    pub fn new(store: &'a dyn ProductStore) -> Self {
        Self { store }
    }

    /// Validate, reject taken names, then insert. A name taken between the check and
    /// the insert is caught by the store's unique constraint and reported the same way.
    pub async fn create(&self, body: &Map<String, Value>) -> Result<Product, AppError> {
        let input = ProductValidator::validate(body)?;
        if self.store.name_exists(&input.name).await? {
            tracing::warn!(name = %input.name, "rejected duplicate product name");
            return Err(AppError::Validation(FieldErrors::single("name", NAME_TAKEN)));
        }
        let product = self.store.create(input.into()).await?;
        tracing::info!(id = product.id, slug = %product.slug, "product created");
        Ok(product)
    }

    pub async fn show(&self, id: i64) -> Result<Product, AppError> {
        self.store.find(id).await?.ok_or_else(|| not_found(id))
    }

    /// A missing record wins over an invalid body. Name uniqueness is not pre-checked
    /// here; only the storage constraint stops a rename onto another product's name.
    pub async fn update(&self, id: i64, body: &Map<String, Value>) -> Result<Product, AppError> {
        if self.store.find(id).await?.is_none() {
            return Err(not_found(id));
        }
        let input = ProductValidator::validate(body)?;
        let product = self
            .store
            .update(id, input.into())
            .await?
            .ok_or_else(|| not_found(id))?;
        tracing::info!(id = product.id, slug = %product.slug, "product updated");
        Ok(product)
    }

    pub async fn destroy(&self, id: i64) -> Result<(), AppError> {
        if !self.store.delete(id).await? {
            return Err(not_found(id));
        }
        tracing::info!(id, "product deleted");
        Ok(())
    }

    /// One page of products in id order, wrapped with links built from `path`.
    pub async fn index(&self, request: PageRequest, path: &str) -> Result<ProductPage, AppError> {
        let page = self.store.list(request).await?;
        Ok(ProductPage::new(page, request, path))
    }
}
