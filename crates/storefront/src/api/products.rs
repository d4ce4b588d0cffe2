//! Product endpoints, with an in-process response cache.
//!
//! Listings and details are cached for the configured TTL. Any successful
//! admin mutation drops the whole cache, since a single product can appear in
//! any number of cached listings.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use super::{ApiClient, ApiResponse};
use crate::models::{Page, Product, ProductCreate, ProductQuery, ProductUpdate};

/// Cached successful responses.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Page<Product>),
}

/// `/products/*` endpoints.
#[derive(Clone)]
pub struct ProductService {
    inner: Arc<ProductServiceInner>,
}

struct ProductServiceInner {
    client: ApiClient,
    cache: Cache<String, CacheValue>,
}

impl ProductService {
    /// Create a service whose cached responses live for `ttl`.
    #[must_use]
    pub fn new(client: ApiClient, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(ttl)
            .build();

        Self {
            inner: Arc::new(ProductServiceInner { client, cache }),
        }
    }

    /// List products matching `query`.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &ProductQuery) -> ApiResponse<Page<Product>> {
        let query = query.to_query_string();
        let endpoint = if query.is_empty() {
            "/products/".to_string()
        } else {
            format!("/products/?{query}")
        };

        if let Some(CacheValue::Products(page)) = self.inner.cache.get(&endpoint).await {
            debug!("Cache hit for products");
            return cached(page);
        }

        let response: ApiResponse<Page<Product>> = self.inner.client.get(&endpoint, false).await;
        if let Some(page) = &response.data {
            self.inner
                .cache
                .insert(endpoint, CacheValue::Products(page.clone()))
                .await;
        }
        response
    }

    /// Fetch one product.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> ApiResponse<Product> {
        let endpoint = format!("/products/{}", urlencoding::encode(id));

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&endpoint).await {
            debug!("Cache hit for product");
            return cached(*product);
        }

        let response: ApiResponse<Product> = self.inner.client.get(&endpoint, false).await;
        if let Some(product) = &response.data {
            self.inner
                .cache
                .insert(endpoint, CacheValue::Product(Box::new(product.clone())))
                .await;
        }
        response
    }

    /// Create a product (admin).
    #[instrument(skip(self, product), fields(title = %product.title))]
    pub async fn create(&self, product: &ProductCreate) -> ApiResponse<Product> {
        let response = self.inner.client.post("/products/", product, true).await;
        self.invalidate_on_success(&response);
        response
    }

    /// Update a product (admin).
    #[instrument(skip(self, update))]
    pub async fn update(&self, id: &str, update: &ProductUpdate) -> ApiResponse<Product> {
        let endpoint = format!("/products/{}", urlencoding::encode(id));
        let response = self.inner.client.put(&endpoint, update, true).await;
        self.invalidate_on_success(&response);
        response
    }

    /// Delete a product (admin).
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> ApiResponse<serde_json::Value> {
        let endpoint = format!("/products/{}", urlencoding::encode(id));
        let response = self.inner.client.delete(&endpoint, true).await;
        self.invalidate_on_success(&response);
        response
    }

    /// Drop every cached response.
    pub fn invalidate(&self) {
        self.inner.cache.invalidate_all();
    }

    fn invalidate_on_success<T>(&self, response: &ApiResponse<T>) {
        if response.is_success() {
            debug!("Invalidating product cache");
            self.invalidate();
        }
    }
}

fn cached<T>(data: T) -> ApiResponse<T> {
    ApiResponse {
        data: Some(data),
        error: None,
        status: 200,
    }
}
