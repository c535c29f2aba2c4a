//! # Product Catalog Seam
//!
//! The catalog is an external collaborator: it can be slow, down, or simply
//! not know a product any more. Nothing monetary depends on it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CatalogLookup::product_name("prod-1")                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tokio::time::timeout(catalog_timeout, catalog.lookup(..))             │
//! │       │                                                                 │
//! │       ├── Ok(Ok(Some(entry)))  → entry.name                            │
//! │       ├── Ok(Ok(None))         → placeholder   (product gone)          │
//! │       ├── Ok(Err(e))           → placeholder   (warn!)                 │
//! │       └── Err(elapsed)         → placeholder   (warn!)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mall_db::ProductRepository;
use tracing::{debug, warn};

use crate::error::CatalogError;

/// What the catalog knows about a product right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    /// Current list price in cents (display only).
    pub price_cents: i64,
}

/// Lookup of current product details by id.
///
/// Implementations:
/// - `ProductRepository`: the local `products` table
/// - test doubles in the integration tests
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// `Ok(None)` when the product is unknown.
    async fn lookup(&self, product_id: &str) -> Result<Option<CatalogEntry>, CatalogError>;
}

#[async_trait]
impl ProductCatalog for ProductRepository {
    async fn lookup(&self, product_id: &str) -> Result<Option<CatalogEntry>, CatalogError> {
        let product = self
            .get_by_id(product_id)
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

        Ok(product.map(|p| CatalogEntry {
            name: p.name,
            price_cents: p.price_cents,
        }))
    }
}

/// Best-effort catalog access with a timeout and a placeholder fallback.
#[derive(Clone)]
pub struct CatalogLookup {
    catalog: Arc<dyn ProductCatalog>,
    timeout: Duration,
    placeholder: String,
}

impl std::fmt::Debug for CatalogLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogLookup")
            .field("timeout", &self.timeout)
            .field("placeholder", &self.placeholder)
            .finish_non_exhaustive()
    }
}

impl CatalogLookup {
    pub fn new(catalog: Arc<dyn ProductCatalog>, timeout: Duration, placeholder: String) -> Self {
        CatalogLookup {
            catalog,
            timeout,
            placeholder,
        }
    }

    /// Name to record for a product; never fails.
    pub async fn product_name(&self, product_id: &str) -> String {
        match self.fetch(product_id).await {
            Some(entry) => entry.name,
            None => self.placeholder.clone(),
        }
    }

    /// Current name and price, or the placeholder with price 0.
    pub async fn entry_or_placeholder(&self, product_id: &str) -> CatalogEntry {
        self.fetch(product_id).await.unwrap_or_else(|| CatalogEntry {
            name: self.placeholder.clone(),
            price_cents: 0,
        })
    }

    async fn fetch(&self, product_id: &str) -> Option<CatalogEntry> {
        let result = tokio::time::timeout(self.timeout, self.catalog.lookup(product_id))
            .await
            .unwrap_or(Err(CatalogError::Timeout(self.timeout)));

        match result {
            Ok(Some(entry)) => Some(entry),
            Ok(None) => {
                debug!(product_id = %product_id, "Product not in catalog");
                None
            }
            Err(e) => {
                warn!(product_id = %product_id, error = %e, "Catalog lookup failed, using placeholder");
                None
            }
        }
    }
}
