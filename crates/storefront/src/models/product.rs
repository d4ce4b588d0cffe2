//! Catalog records and listing queries.

use baiyit_core::{Price, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog product.
///
/// The backend has spelled the markdown fields two ways over time
/// (`discount_price`, and `original_price` + `discount` percentage); both are
/// accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Price>,
    #[serde(default, alias = "originalPrice", skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    /// Percentage off the original price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub specs: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "super::timestamp::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "super::timestamp::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Whether the product is flagged as featured.
    #[must_use]
    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }

    /// Spec bullet points, empty when absent.
    #[must_use]
    pub fn specs(&self) -> &[String] {
        self.specs.as_deref().unwrap_or_default()
    }

    /// The price a shopper pays: the discount price when one is set.
    #[must_use]
    pub fn selling_price(&self) -> Price {
        self.discount_price.unwrap_or(self.price)
    }

    /// Exact category match.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category)
    }

    /// Case-insensitive keyword match against title and description.
    /// A blank keyword matches everything.
    #[must_use]
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.trim().to_lowercase();
        needle.is_empty()
            || self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}

/// Admin payload for `POST /products/`.
#[derive(Debug, Clone, Serialize)]
pub struct ProductCreate {
    pub title: String,
    pub description: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Price>,
    pub image: String,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specs: Option<Vec<String>>,
}

/// Admin payload for `PUT /products/{id}`; only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specs: Option<Vec<String>>,
}

/// Pagination envelope: `{data, total, page, pages}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub pages: u32,
}

/// Query parameters for `GET /products/`.
///
/// Only fields that are set end up in the query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort_by: Option<String>,
    pub descending: Option<bool>,
    pub use_or: Option<bool>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub min_rating: Option<f64>,
}

impl ProductQuery {
    /// Encode the set fields, in declaration order.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                query.append_pair(key, &value);
            }
        };

        push("page", self.page.map(|v| v.to_string()));
        push("size", self.size.map(|v| v.to_string()));
        push("sort_by", self.sort_by.clone());
        push("descending", self.descending.map(|v| v.to_string()));
        push("use_or", self.use_or.map(|v| v.to_string()));
        push("search", self.search.clone());
        push("category", self.category.clone());
        push("featured", self.featured.map(|v| v.to_string()));
        push("min_price", self.min_price.map(|v| v.amount().to_string()));
        push("max_price", self.max_price.map(|v| v.amount().to_string()));
        push("min_rating", self.min_rating.map(|v| v.to_string()));

        query.finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_both_markdown_spellings() {
        let listing: Product = serde_json::from_value(serde_json::json!({
            "id": "laptop-2",
            "title": "GameMaster X",
            "description": "Ultimate gaming experience",
            "price": 1799.99,
            "originalPrice": 1999.99,
            "discount": 10,
            "image": "gm.jpg",
            "rating": 4.7,
            "specs": ["32GB RAM"]
        }))
        .unwrap();
        assert_eq!(listing.original_price, Some(Price::from_cents(199_999)));
        assert_eq!(listing.discount, Some(10.0));
        assert_eq!(listing.selling_price(), Price::from_cents(179_999));
        assert!(!listing.is_featured());

        let api: Product = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "title": "Chair",
            "description": "",
            "price": 399,
            "discount_price": 349,
            "image": "",
            "rating": 4.9,
            "category": "home",
            "featured": true,
            "specs": null,
            "created_at": "2024-01-01T00:00:00",
            "updated_at": "2024-01-01T00:00:00"
        }))
        .unwrap();
        assert_eq!(api.selling_price(), Price::from_cents(34_900));
        assert!(api.specs().is_empty());
        assert!(api.in_category("home"));
        assert!(api.created_at.is_some());
    }

    #[test]
    fn test_keyword_matching_is_case_insensitive() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": "audio-1",
            "title": "SoundMaster Pro",
            "description": "Premium noise cancellation",
            "price": 349.99,
            "category": "electronics"
        }))
        .unwrap();
        assert!(product.matches_keyword("soundmaster"));
        assert!(product.matches_keyword("NOISE"));
        assert!(!product.matches_keyword("electro"));
        assert!(product.matches_keyword("  "));
        assert!(!product.matches_keyword("laptop"));
    }

    #[test]
    fn test_query_string_only_includes_set_fields() {
        assert_eq!(ProductQuery::default().to_query_string(), "");

        let query = ProductQuery {
            page: Some(1),
            size: Some(3),
            search: Some("noise cancelling".to_string()),
            featured: Some(true),
            min_price: Some(Price::from_cents(9_950)),
            ..ProductQuery::default()
        };
        assert_eq!(
            query.to_query_string(),
            "page=1&size=3&search=noise+cancelling&featured=true&min_price=99.50"
        );
    }
}
