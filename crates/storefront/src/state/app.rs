//! The wired-up storefront: one store, one API client, every container.

use std::sync::Arc;

use crate::api::{ApiClient, AuthService, OrderService, ProductService};
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::loaders::{
    AcquisitionsLoader, OrdersLoader, ProductsLoader, Recommendations, SessionsLoader,
};
use crate::models::Order;
use crate::notify::Toaster;
use crate::storage::{FileStore, SharedStore, StorageError, TokenStore};

use super::{AssistantContext, AuthContext, BagContext, CartContext, ConciergeChat, SessionContext};

/// Everything a front end needs, sharing one store and one toast channel.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StorefrontConfig,
    store: SharedStore,
    toaster: Toaster,
    products: ProductService,
    orders: OrderService,
    auth: AuthContext,
    cart: CartContext,
    bag: BagContext,
    sessions: SessionContext,
    assistant: AssistantContext,
    concierge: ConciergeChat,
}

impl Storefront {
    /// Wire every service and container over `store`.
    #[must_use]
    pub fn new(config: StorefrontConfig, store: SharedStore) -> Self {
        let toaster = Toaster::new();
        let tokens = TokenStore::new(store.clone());
        let client = ApiClient::new(&config.api_base_url, tokens.clone());

        let products = ProductService::new(client.clone(), config.product_cache_ttl);
        let orders = OrderService::new(client.clone());
        let auth = AuthContext::new(AuthService::new(client), tokens, toaster.clone());

        let cart = CartContext::new(store.clone(), toaster.clone());
        let bag = BagContext::new(store.clone());
        let sessions = SessionContext::new(store.clone());
        let assistant = AssistantContext::new(store.clone(), config.latency.assistant);
        let concierge = ConciergeChat::new(
            sessions.clone(),
            Some(products.clone()),
            config.latency.assistant,
        );

        Self {
            inner: Arc::new(StorefrontInner {
                config,
                store,
                toaster,
                products,
                orders,
                auth,
                cart,
                bag,
                sessions,
                assistant,
                concierge,
            }),
        }
    }

    /// Wire over the JSON file store at [`StorefrontConfig::storage_path`].
    ///
    /// # Errors
    ///
    /// Returns an error if the store file exists but cannot be read.
    pub fn open(config: StorefrontConfig) -> std::result::Result<Self, StorageError> {
        let store: SharedStore = Arc::new(FileStore::open(config.storage_path())?);
        Ok(Self::new(config, store))
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn store(&self) -> &SharedStore {
        &self.inner.store
    }

    #[must_use]
    pub fn toaster(&self) -> &Toaster {
        &self.inner.toaster
    }

    #[must_use]
    pub fn products(&self) -> &ProductService {
        &self.inner.products
    }

    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    #[must_use]
    pub fn auth(&self) -> &AuthContext {
        &self.inner.auth
    }

    #[must_use]
    pub fn cart(&self) -> &CartContext {
        &self.inner.cart
    }

    #[must_use]
    pub fn bag(&self) -> &BagContext {
        &self.inner.bag
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionContext {
        &self.inner.sessions
    }

    #[must_use]
    pub fn assistant(&self) -> &AssistantContext {
        &self.inner.assistant
    }

    #[must_use]
    pub fn concierge(&self) -> &ConciergeChat {
        &self.inner.concierge
    }

    /// Check out the cart as the current user.
    ///
    /// # Errors
    ///
    /// See [`CartContext::place_order`].
    pub async fn checkout(&self) -> Result<Order> {
        let is_authenticated = self.auth().is_authenticated();
        self.cart().place_order(self.orders(), is_authenticated).await
    }

    // =========================================================================
    // Loaders
    // =========================================================================

    #[must_use]
    pub fn products_loader(&self) -> ProductsLoader {
        ProductsLoader::new(self.inner.config.latency.catalog)
    }

    #[must_use]
    pub fn orders_loader(&self) -> OrdersLoader {
        OrdersLoader::new(self.inner.orders.clone(), self.inner.toaster.clone())
    }

    #[must_use]
    pub fn acquisitions_loader(&self) -> AcquisitionsLoader {
        AcquisitionsLoader::new(self.inner.config.latency.history)
    }

    #[must_use]
    pub fn sessions_loader(&self) -> SessionsLoader {
        SessionsLoader::new(self.inner.config.latency.history)
    }

    /// Recommendations for the assistant conversation so far.
    ///
    /// Empty until the assistant has replied at least once.
    #[must_use]
    pub fn recommendations(&self) -> Recommendations {
        let recommendations = Recommendations::new();
        recommendations.update(&self.inner.assistant.messages());
        recommendations
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::LatencyConfig;
    use crate::error::{StorefrontError, ValidationError};
    use crate::models::test_support::line;
    use crate::storage::MemoryStore;

    fn storefront(store: SharedStore) -> Storefront {
        let mut config = StorefrontConfig::from_lookup(|_| None).unwrap();
        config.latency = LatencyConfig::none();
        Storefront::new(config, store)
    }

    #[test]
    fn test_containers_share_the_store() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let first = storefront(store.clone());
        first.cart().add_item(line("p1", 1_000, 2));
        first.bag().add_item(line("p2", 500, 1));

        let second = storefront(store);
        assert_eq!(second.cart().item_count(), 2);
        assert_eq!(second.bag().items().len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_requires_login() {
        let storefront = storefront(Arc::new(MemoryStore::new()));
        storefront.cart().add_item(line("p1", 1_000, 1));

        let err = storefront.checkout().await.unwrap_err();
        assert!(matches!(
            err,
            StorefrontError::Validation(ValidationError::NotLoggedIn)
        ));
        assert_eq!(storefront.cart().item_count(), 1);
    }

    #[tokio::test]
    async fn test_recommendations_follow_the_assistant() {
        let storefront = storefront(Arc::new(MemoryStore::new()));
        assert!(storefront.recommendations().products().is_empty());

        storefront
            .assistant()
            .send_message("Any laptop deals?")
            .await
            .unwrap();

        let products = storefront.recommendations().products();
        assert_eq!(products.len(), 4);
        assert_eq!(products[3].title, "WorkStation Pro");
    }
}
