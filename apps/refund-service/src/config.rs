//! Refund service configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                        | Default           |
//! |---------------------------------|-------------------|
//! | `MALL_DB_PATH`                  | `mall.db`         |
//! | `MALL_DB_MAX_CONNECTIONS`       | `5`               |
//! | `MALL_DB_BUSY_TIMEOUT_SECS`     | `5`               |
//! | `MALL_RUN_MIGRATIONS`           | `true`            |
//! | `MALL_CATALOG_TIMEOUT_MS`       | `2000`            |
//! | `MALL_PLACEHOLDER_PRODUCT_NAME` | `Unknown product` |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use mall_core::PLACEHOLDER_PRODUCT_NAME;
use mall_db::DbConfig;
use serde::Serialize;

use crate::catalog::{CatalogLookup, ProductCatalog};
use crate::error::ConfigError;

/// Refund service configuration.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// How long a refund waits for another refund's write lock
    pub db_busy_timeout: Duration,

    /// Apply embedded migrations on connect
    pub run_migrations: bool,

    /// Upper bound on a single catalog lookup
    pub catalog_timeout: Duration,

    /// Name recorded when the catalog cannot supply one
    pub placeholder_product_name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            db_path: PathBuf::from("mall.db"),
            db_max_connections: 5,
            db_busy_timeout: Duration::from_secs(5),
            run_migrations: true,
            catalog_timeout: Duration::from_millis(2000),
            placeholder_product_name: PLACEHOLDER_PRODUCT_NAME.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServiceConfig::default();

        let config = ServiceConfig {
            db_path: lookup("MALL_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),

            db_max_connections: parse_or(&lookup, "MALL_DB_MAX_CONNECTIONS", 5)?,

            db_busy_timeout: Duration::from_secs(parse_or(
                &lookup,
                "MALL_DB_BUSY_TIMEOUT_SECS",
                5,
            )?),

            run_migrations: parse_or(&lookup, "MALL_RUN_MIGRATIONS", true)?,

            catalog_timeout: Duration::from_millis(parse_or(
                &lookup,
                "MALL_CATALOG_TIMEOUT_MS",
                2000,
            )?),

            placeholder_product_name: lookup("MALL_PLACEHOLDER_PRODUCT_NAME")
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(defaults.placeholder_product_name),
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "MALL_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.db_path)
            .max_connections(self.db_max_connections)
            .busy_timeout(self.db_busy_timeout)
            .run_migrations(self.run_migrations)
    }

    /// Wraps a catalog with this configuration's timeout and placeholder.
    pub fn catalog_lookup(&self, catalog: Arc<dyn ProductCatalog>) -> CatalogLookup {
        CatalogLookup::new(
            catalog,
            self.catalog_timeout,
            self.placeholder_product_name.clone(),
        )
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}
