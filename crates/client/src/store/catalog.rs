//! Product catalog client.
//!
//! Read-only from this codebase's perspective. Responses are cached with
//! `moka` (5-minute TTL) since the catalog changes far less often than it
//! is browsed.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use cartwheel_core::{Product, ProductId};

use crate::config::ClientConfig;

use super::cache::{CacheKey, CacheValue};
use super::{StoreError, decode_response};

const CACHE_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Client for the read-only product collection.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogInner>,
}

struct CatalogInner {
    client: reqwest::Client,
    base: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(CatalogInner {
                client: reqwest::Client::new(),
                base: config.endpoint_base(),
                cache,
            }),
        }
    }

    /// Fetch all products, from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the request or decode fails.
    pub async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            tracing::debug!("catalog cache hit: products");
            return Ok(products);
        }

        let response = self
            .inner
            .client
            .get(format!("{}/products", self.inner.base))
            .send()
            .await?;
        let products: Vec<Product> = decode_response(response, "products").await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// Fetch all products that have stock left.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the request or decode fails.
    pub async fn list_in_stock(&self) -> Result<Vec<Product>, StoreError> {
        let mut products = self.list_products().await?;
        products.retain(Product::in_stock);
        Ok(products)
    }

    /// Fetch a single product by id, from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no product has this id.
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, StoreError> {
        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            tracing::debug!(product = %id, "catalog cache hit");
            return Ok(*product);
        }

        let response = self
            .inner
            .client
            .get(format!("{}/products/{id}", self.inner.base))
            .send()
            .await?;
        let product: Product = decode_response(response, id.as_str()).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }
}
