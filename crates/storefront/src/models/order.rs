//! Order records and the checkout payload.

use baiyit_core::{OrderId, OrderStatus, Price, ProductId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::LineItems;

/// A placed order. Status transitions are owned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total: Price,
    pub status: OrderStatus,
    #[serde(default)]
    pub items: Option<Vec<OrderItem>>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Items, empty when the backend omitted them.
    #[must_use]
    pub fn items(&self) -> &[OrderItem] {
        self.items.as_deref().unwrap_or_default()
    }
}

/// An order line as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
}

/// An order line in a checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemCreate {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Checkout request body for `POST /orders/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<OrderItemCreate>,
}

impl From<&LineItems> for OrderCreate {
    fn from(lines: &LineItems) -> Self {
        Self {
            items: lines
                .iter()
                .map(|line| OrderItemCreate {
                    product_id: line.id.clone(),
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}

/// Query parameters for `GET /orders/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort_by: Option<String>,
    pub descending: Option<bool>,
    pub use_or: Option<bool>,
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
}

impl OrderQuery {
    /// The listing used by the order history page: first ten, newest first.
    #[must_use]
    pub fn recent() -> Self {
        Self {
            page: Some(1),
            size: Some(10),
            sort_by: Some("created_at".to_string()),
            descending: Some(true),
            ..Self::default()
        }
    }

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
        push("status", self.status.map(|v| v.to_string()));

        query.finish()
    }
}
