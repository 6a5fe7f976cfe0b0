//! In-process product store. Same contract as the PostgreSQL store; rows live until the process exits.

use super::{Page, PageRequest, Product, ProductFields, ProductStore};
use crate::error::StoreError;
use crate::slug::slugify;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Rows {
    last_id: i64,
    by_id: BTreeMap<i64, Product>,
}

impl Rows {
    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.by_id
            .values()
            .any(|p| p.name == name && Some(p.id) != except)
    }
}

#[derive(Default)]
pub struct MemoryProductStore {
    rows: RwLock<Rows>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Rows> {
        self.rows.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Rows> {
        self.rows.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn create(&self, fields: ProductFields) -> Result<Product, StoreError> {
        fields.check_name()?;
        let mut rows = self.write();
        if rows.name_taken(&fields.name, None) {
            return Err(StoreError::DuplicateName(fields.name));
        }
        rows.last_id += 1;
        let now = Utc::now();
        let product = Product {
            id: rows.last_id,
            slug: slugify(&fields.name),
            name: fields.name,
            price: fields.price,
            image: None,
            created_at: now,
            updated_at: now,
        };
        rows.by_id.insert(product.id, product.clone());
        Ok(product)
    }

    async fn find(&self, id: i64) -> Result<Option<Product>, StoreError> {
        Ok(self.read().by_id.get(&id).cloned())
    }

    async fn update(&self, id: i64, fields: ProductFields) -> Result<Option<Product>, StoreError> {
        fields.check_name()?;
        let mut rows = self.write();
        if !rows.by_id.contains_key(&id) {
            return Ok(None);
        }
        if rows.name_taken(&fields.name, Some(id)) {
            return Err(StoreError::DuplicateName(fields.name));
        }
        let Some(product) = rows.by_id.get_mut(&id) else {
            return Ok(None);
        };
        product.slug = slugify(&fields.name);
        product.name = fields.name;
        product.price = fields.price;
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.write().by_id.remove(&id).is_some())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Product>, StoreError> {
        let rows = self.read();
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.per_page).unwrap_or(usize::MAX);
        let items = rows.by_id.values().skip(skip).take(take).cloned().collect();
        Ok(Page {
            items,
            total: rows.by_id.len() as u64,
        })
    }

    async fn name_exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.read().name_taken(name, None))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, price: i64) -> ProductFields {
        ProductFields {
            name: name.to_string(),
            price,
        }
    }

    #[tokio::test]
    async fn create_assigns_ids_and_slug() {
        let store = MemoryProductStore::new();
        let a = store.create(fields("Widget", 42)).await.unwrap();
        let b = store.create(fields("Crème Brûlée", 7)).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(a.slug, "widget");
        assert_eq!(b.slug, "creme-brulee");
        assert_eq!(a.created_at, a.updated_at);
        assert_eq!(store.find(1).await.unwrap(), Some(a));
    }

    #[tokio::test]
    async fn duplicate_names_are_rejected_case_sensitively() {
        let store = MemoryProductStore::new();
        store.create(fields("Widget", 1)).await.unwrap();
        assert!(matches!(
            store.create(fields("Widget", 2)).await,
            Err(StoreError::DuplicateName(name)) if name == "Widget"
        ));
        assert!(store.create(fields("widget", 2)).await.is_ok());
        assert!(store.name_exists("Widget").await.unwrap());
        assert!(!store.name_exists("Gadget").await.unwrap());
    }

    #[tokio::test]
    async fn update_rewrites_slug_and_keeps_created_at() {
        let store = MemoryProductStore::new();
        let original = store.create(fields("Widget", 42)).await.unwrap();
        let updated = store.update(original.id, fields("Widget Pro", 50)).await.unwrap().unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.slug, "widget-pro");
        assert_eq!(updated.price, 50);
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at >= original.updated_at);
    }

    #[tokio::test]
    async fn update_allows_same_name_but_not_anothers() {
        let store = MemoryProductStore::new();
        let a = store.create(fields("Widget", 1)).await.unwrap();
        store.create(fields("Gadget", 2)).await.unwrap();
        assert!(store.update(a.id, fields("Widget", 3)).await.is_ok());
        assert!(matches!(
            store.update(a.id, fields("Gadget", 3)).await,
            Err(StoreError::DuplicateName(_))
        ));
        assert_eq!(store.update(99, fields("Nope", 1)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn blank_and_over_long_names_are_not_written() {
        let store = MemoryProductStore::new();
        assert!(matches!(store.create(fields("", 1)).await, Err(StoreError::EmptyName)));
        assert!(matches!(
            store.create(fields(&"x".repeat(256), 1)).await,
            Err(StoreError::NameTooLong(256))
        ));
        let a = store.create(fields("Widget", 1)).await.unwrap();
        assert!(matches!(store.update(a.id, fields(" ", 2)).await, Err(StoreError::EmptyName)));
        assert_eq!(store.find(a.id).await.unwrap(), Some(a));
        assert_eq!(store.list(PageRequest::new(1, 15)).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn delete_reports_missing_rows() {
        let store = MemoryProductStore::new();
        let a = store.create(fields("Widget", 1)).await.unwrap();
        assert!(store.delete(a.id).await.unwrap());
        assert!(!store.delete(a.id).await.unwrap());
        assert_eq!(store.find(a.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryProductStore::new();
        let a = store.create(fields("A", 1)).await.unwrap();
        store.delete(a.id).await.unwrap();
        let b = store.create(fields("B", 1)).await.unwrap();
        assert_eq!(b.id, a.id + 1);
    }

    #[tokio::test]
    async fn list_slices_in_id_order() {
        let store = MemoryProductStore::new();
        for i in 1..=5 {
            store.create(fields(&format!("P{i}"), i)).await.unwrap();
        }
        let page = store.list(PageRequest::new(2, 2)).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.iter().map(|p| p.id).collect::<Vec<_>>(), vec![3, 4]);
        let past_end = store.list(PageRequest::new(4, 2)).await.unwrap();
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 5);
    }
}
