//! Product API server: loads config from env (and `.env`), prepares the store, serves the router.

use product_api::{
    app, apply_migrations, ensure_database_exists, AppConfig, AppState, MemoryProductStore, PgProductStore,
    StoreBackend,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("product_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let state = match config.store_backend {
        StoreBackend::Postgres => {
            ensure_database_exists(&config.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await?;
            apply_migrations(&pool).await?;
            AppState::new(PgProductStore::new(pool), config.clone())
        }
        StoreBackend::Memory => {
            tracing::warn!("using the in-memory product store; data is lost on exit");
            AppState::new(MemoryProductStore::new(), config.clone())
        }
    };

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
