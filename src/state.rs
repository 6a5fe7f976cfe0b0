//! Shared application state for all routes: the product store and the runtime config.

use crate::config::AppConfig;
use crate::store::ProductStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new<S>(store: S, config: AppConfig) -> Self
    where
        S: ProductStore + 'static,
    {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}
