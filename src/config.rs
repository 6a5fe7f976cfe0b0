//! Runtime configuration from environment variables (a `.env` file is loaded first by the binary).
//!
//! | Variable                   | Default                          |
//! |----------------------------|----------------------------------|
//! | `DATABASE_URL`             | `postgres://localhost/products`  |
//! | `STORE_BACKEND`            | `postgres` (or `memory`)         |
//! | `DATABASE_MAX_CONNECTIONS` | `5`                              |
//! | `BIND_ADDR`                | `0.0.0.0:3000`                   |
//! | `APP_URL`                  | `http://localhost`               |
//! | `PRODUCTS_PER_PAGE`        | `15`                             |
//! | `BODY_LIMIT_BYTES`         | `1048576`                        |

use crate::error::ConfigError;
use std::str::FromStr;

pub const DEFAULT_PER_PAGE: u64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StoreBackend::Postgres),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub store_backend: StoreBackend,
    pub max_connections: u32,
    pub bind_addr: String,
    /// Public base URL used to build pagination links, without trailing slash.
    pub app_url: String,
    pub per_page: u64,
    pub body_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/products".into(),
            store_backend: StoreBackend::Postgres,
            max_connections: 5,
            bind_addr: "0.0.0.0:3000".into(),
            app_url: "http://localhost".into(),
            per_page: DEFAULT_PER_PAGE,
            body_limit: 1024 * 1024,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup; unset or blank keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let store_backend = match get("STORE_BACKEND") {
            Some(v) => v.parse()?,
            None => defaults.store_backend,
        };
        let per_page = parse_or(get("PRODUCTS_PER_PAGE"), "PRODUCTS_PER_PAGE", defaults.per_page)?;
        if per_page == 0 {
            return Err(ConfigError::Invalid {
                key: "PRODUCTS_PER_PAGE",
                value: "0".into(),
            });
        }

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            store_backend,
            max_connections: parse_or(get("DATABASE_MAX_CONNECTIONS"), "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            app_url: get("APP_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.app_url),
            per_page,
            body_limit: parse_or(get("BODY_LIMIT_BYTES"), "BODY_LIMIT_BYTES", defaults.body_limit)?,
        })
    }

    /// Absolute URL of the product collection, e.g. `http://localhost/api/product`.
    pub fn products_url(&self) -> String {
        format!("{}/api/product", self.app_url)
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key, value: v }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = from_pairs(&[]).unwrap();
        assert_eq!(cfg.store_backend, StoreBackend::Postgres);
        assert_eq!(cfg.per_page, 15);
        assert_eq!(cfg.products_url(), "http://localhost/api/product");
    }

    #[test]
    fn reads_overrides() {
        let cfg = from_pairs(&[
            ("STORE_BACKEND", "Memory"),
            ("APP_URL", "https://shop.example.com/"),
            ("PRODUCTS_PER_PAGE", "2"),
            ("DATABASE_MAX_CONNECTIONS", " 10 "),
            ("BIND_ADDR", "127.0.0.1:8080"),
        ])
        .unwrap();
        assert_eq!(cfg.store_backend, StoreBackend::Memory);
        assert_eq!(cfg.products_url(), "https://shop.example.com/api/product");
        assert_eq!(cfg.per_page, 2);
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
    }

    #[test]
    fn rejects_bad_numbers_and_backends() {
        assert!(matches!(
            from_pairs(&[("PRODUCTS_PER_PAGE", "many")]),
            Err(ConfigError::Invalid { key: "PRODUCTS_PER_PAGE", .. })
        ));
        assert!(matches!(
            from_pairs(&[("PRODUCTS_PER_PAGE", "0")]),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            from_pairs(&[("STORE_BACKEND", "redis")]),
            Err(ConfigError::UnknownBackend(b)) if b == "redis"
        ));
    }
}
