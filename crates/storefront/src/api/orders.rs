//! Order endpoints. All of them require authentication.

use tracing::instrument;

use super::{ApiClient, ApiResponse};
use crate::models::{Order, OrderCreate, OrderQuery, Page};

/// `/orders/*` endpoints.
#[derive(Clone)]
pub struct OrderService {
    client: ApiClient,
}

impl OrderService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List the current user's orders.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &OrderQuery) -> ApiResponse<Page<Order>> {
        let query = query.to_query_string();
        let endpoint = if query.is_empty() {
            "/orders/".to_string()
        } else {
            format!("/orders/?{query}")
        };
        self.client.get(&endpoint, true).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> ApiResponse<Order> {
        self.client
            .get(&format!("/orders/{}", urlencoding::encode(id)), true)
            .await
    }

    /// Place an order.
    #[instrument(skip(self, order), fields(lines = order.items.len()))]
    pub async fn create(&self, order: &OrderCreate) -> ApiResponse<Order> {
        self.client.post("/orders/", order, true).await
    }

    /// Ask the backend to cancel an order. Whether it can is the backend's call.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: &str) -> ApiResponse<serde_json::Value> {
        self.client
            .patch(
                &format!("/orders/{}/cancel", urlencoding::encode(id)),
                &serde_json::json!({}),
                true,
            )
            .await
    }
}
