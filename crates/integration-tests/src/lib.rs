//! Integration tests for the Baiyit storefront client.
//!
//! Every test drives a fully wired [`Storefront`] against a `wiremock`
//! backend, so no real API is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p baiyit-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth_flow` - OTP login, logout, refresh
//! - `checkout` - cart validation and order placement
//! - `catalog` - product listing, caching, concierge search
//! - `orders` - order history and cancellation
//! - `route_gate` - protected-page redirects
//! - `persistence` - file-backed state across restarts

use std::sync::Arc;

use baiyit_storefront::config::LatencyConfig;
use baiyit_storefront::storage::{MemoryStore, SharedStore};
use baiyit_storefront::{Storefront, StorefrontConfig};
use serde_json::{Value, json};
use wiremock::MockServer;

/// A storefront wired to a mock backend, with no simulated latency.
pub struct TestContext {
    pub server: MockServer,
    pub store: SharedStore,
    pub storefront: Storefront,
}

impl TestContext {
    /// Start a mock backend and a storefront over an in-memory store.
    pub async fn start() -> Self {
        let store: SharedStore = Arc::new(MemoryStore::new());
        Self::with_store(store).await
    }

    /// Start a mock backend and a storefront over `store`.
    pub async fn with_store(store: SharedStore) -> Self {
        let server = MockServer::start().await;
        let storefront = Storefront::new(config_for(&server.uri()), store.clone());
        Self {
            server,
            store,
            storefront,
        }
    }
}

/// Configuration pointing at `base_url`, with no simulated latency.
///
/// # Panics
///
/// Panics if `base_url` is not an absolute URL.
#[must_use]
#[allow(clippy::expect_used)]
pub fn config_for(base_url: &str) -> StorefrontConfig {
    let base_url = base_url.to_string();
    let mut config = StorefrontConfig::from_lookup(move |key| {
        (key == "BAIYIT_API_BASE_URL").then(|| base_url.clone())
    })
    .expect("mock server URI is a valid base URL");
    config.latency = LatencyConfig::none();
    config
}

// =============================================================================
// Backend payloads
// =============================================================================

#[must_use]
pub fn user_json() -> Value {
    json!({
        "id": "user-1",
        "email": "user@example.com",
        "first_name": "Ada",
        "last_name": "Shopper",
        "role": "customer",
        "is_suspended": false,
        "created_at": "2024-01-01T00:00:00",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

/// A token pair valid for an hour from now.
#[must_use]
pub fn auth_json() -> Value {
    let now = chrono::Utc::now().timestamp();
    json!({
        "token_type": "Bearer",
        "access_token": "access-abc",
        "expires_at": now + 3_600,
        "refresh_token": "refresh-xyz",
        "refresh_token_expires_at": now + 86_400,
        "user": user_json()
    })
}

#[must_use]
pub fn product_json(id: &str, title: &str, price: f64) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("{title} description"),
        "price": price,
        "image": format!("https://cdn.baiyit.com/{id}.jpg"),
        "rating": 4.5,
        "category": "electronics",
        "specs": ["One", "Two"]
    })
}

#[must_use]
pub fn order_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "user_id": "user-1",
        "total": 30.0,
        "status": status,
        "items": [
            {"product_id": "p1", "quantity": 3, "title": "Widget", "price": 10.0}
        ],
        "created_at": "2024-02-01T12:00:00Z",
        "updated_at": "2024-02-01T12:00:00Z"
    })
}

/// Wrap `data` in the pagination envelope.
#[must_use]
pub fn page_json(data: Vec<Value>) -> Value {
    let total = data.len();
    json!({ "data": data, "total": total, "page": 1, "pages": 1 })
}
