//! PostgreSQL product store over `sqlx::PgPool`.

use super::{Page, PageRequest, Product, ProductFields, ProductStore};
use crate::error::StoreError;
use crate::slug::slugify;
use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

const COLUMNS: &str = "id, name, slug, price, image, created_at, updated_at";

#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique violations on `products.name` surface as `DuplicateName`; everything else is a database error.
fn write_error(err: sqlx::Error, name: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::DuplicateName(name.to_string());
        }
    }
    StoreError::Database(err)
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn create(&self, fields: ProductFields) -> Result<Product, StoreError> {
        fields.check_name()?;
        let slug = slugify(&fields.name);
        let sql = format!(
            "INSERT INTO products (name, slug, price, created_at, updated_at) VALUES ($1, $2, $3, NOW(), NOW()) RETURNING {}",
            COLUMNS
        );
        tracing::debug!(sql = %sql, name = %fields.name, slug = %slug, "query");
        sqlx::query_as::<_, Product>(&sql)
            .bind(&fields.name)
            .bind(&slug)
            .bind(fields.price)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| write_error(e, &fields.name))
    }

    async fn find(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let sql = format!("SELECT {} FROM products WHERE id = $1", COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, fields: ProductFields) -> Result<Option<Product>, StoreError> {
        fields.check_name()?;
        let slug = slugify(&fields.name);
        let sql = format!(
            "UPDATE products SET name = $2, slug = $3, price = $4, updated_at = NOW() WHERE id = $1 RETURNING {}",
            COLUMNS
        );
        tracing::debug!(sql = %sql, id, name = %fields.name, "query");
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(&fields.name)
            .bind(&slug)
            .bind(fields.price)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error(e, &fields.name))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        tracing::debug!(id, "delete product");
        let done = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Product>, StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        let sql = format!("SELECT {} FROM products ORDER BY id ASC LIMIT $1 OFFSET $2", COLUMNS);
        tracing::debug!(sql = %sql, page = page.page, per_page = page.per_page, "query");
        let items = sqlx::query_as::<_, Product>(&sql)
            .bind(to_i64(page.per_page))
            .bind(to_i64(page.offset()))
            .fetch_all(&self.pool)
            .await?;
        Ok(Page {
            items,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn name_exists(&self, name: &str) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE name = $1)")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// server's `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (admin, db_name) = admin_options(database_url)?;
    let Some(db_name) = db_name.filter(|d| !d.is_empty() && d != "postgres") else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Connection options for the server's `postgres` database, plus the database named in `url`, if any.
fn admin_options(url: &str) -> Result<(PgConnectOptions, Option<String>), StoreError> {
    let opts = PgConnectOptions::from_str(url)?;
    let db_name = opts.get_database().map(str::to_string);
    Ok((opts.database("postgres"), db_name))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
