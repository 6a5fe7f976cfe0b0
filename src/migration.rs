//! Schema for the products table. Every statement is idempotent so it can run on each startup.

use crate::error::StoreError;
use sqlx::PgPool;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        slug TEXT NOT NULL,
        price BIGINT NOT NULL,
        image TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT products_name_unique UNIQUE (name)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS products_slug_idx ON products (slug)",
];

/// Create the products table and its indexes if they do not exist yet.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), StoreError> {
    for ddl in MIGRATIONS {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!(statements = MIGRATIONS.len(), "migrations applied");
    Ok(())
}
