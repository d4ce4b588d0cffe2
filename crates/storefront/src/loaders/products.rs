//! Product listings, from the built-in catalog or the backend.

use std::time::Duration;

use tracing::instrument;

use super::{Resource, fixtures};
use crate::api::ProductService;
use crate::error::Result;
use crate::models::{Product, ProductQuery};

/// Category value that selects every category.
pub const ALL_CATEGORIES: &str = "all";

/// Client-side listing filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact category match; `None` or [`ALL_CATEGORIES`] keeps every category.
    pub category: Option<String>,
    /// Keep only featured products.
    pub featured: bool,
    /// Keep at most this many; zero means no limit.
    pub limit: Option<usize>,
    /// Case-insensitive title/description search.
    pub keyword: Option<String>,
}

impl ProductFilter {
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = (category != ALL_CATEGORIES).then_some(category);
        self
    }

    #[must_use]
    pub const fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Apply category, featured, keyword and then limit, keeping order.
    #[must_use]
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        let category = self.category.as_deref().filter(|c| *c != ALL_CATEGORIES);
        let mut kept: Vec<Product> = products
            .into_iter()
            .filter(|p| category.is_none_or(|c| p.in_category(c)))
            .filter(|p| !self.featured || p.is_featured())
            .filter(|p| self.keyword.as_deref().is_none_or(|k| p.matches_keyword(k)))
            .collect();

        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            kept.truncate(limit);
        }
        kept
    }
}

/// Loads product listings into a [`Resource`].
#[derive(Clone)]
pub struct ProductsLoader {
    resource: Resource<Vec<Product>>,
    catalog_delay: Duration,
}

impl ProductsLoader {
    /// `catalog_delay` is the simulated latency of the built-in catalog.
    #[must_use]
    pub fn new(catalog_delay: Duration) -> Self {
        Self {
            resource: Resource::new(),
            catalog_delay,
        }
    }

    #[must_use]
    pub const fn resource(&self) -> &Resource<Vec<Product>> {
        &self.resource
    }

    /// Load the built-in catalog.
    ///
    /// # Errors
    ///
    /// Infallible in practice; the signature matches [`Self::load_remote`].
    #[instrument(skip(self))]
    pub async fn load_catalog(&self, filter: &ProductFilter) -> Result<()> {
        let delay = self.catalog_delay;
        self.resource
            .load(async move {
                tokio::time::sleep(delay).await;
                Ok(filter.apply(fixtures::catalog()))
            })
            .await
    }

    /// Load a page from the backend, then filter it locally.
    ///
    /// # Errors
    ///
    /// Returns the API error; the previous listing stays published.
    #[instrument(skip(self, products))]
    pub async fn load_remote(
        &self,
        products: &ProductService,
        query: &ProductQuery,
        filter: &ProductFilter,
    ) -> Result<()> {
        self.resource
            .load(async {
                let page = products.list(query).await.into_result()?;
                Ok(filter.apply(page.data))
            })
            .await
    }
}
