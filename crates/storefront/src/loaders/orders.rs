//! The signed-in user's recent orders.

use baiyit_core::{OrderId, OrderStatus};
use tracing::instrument;

use super::Resource;
use crate::api::OrderService;
use crate::error::Result;
use crate::models::{Order, OrderQuery};
use crate::notify::Toaster;

const CANCEL_SUCCESS: &str = "Order has been cancelled successfully.";
const CANCEL_FAILURE: &str = "Failed to cancel order. Please try again.";

/// Loads the ten most recent orders.
#[derive(Clone)]
pub struct OrdersLoader {
    orders: OrderService,
    toaster: Toaster,
    resource: Resource<Vec<Order>>,
}

impl OrdersLoader {
    #[must_use]
    pub fn new(orders: OrderService, toaster: Toaster) -> Self {
        Self {
            orders,
            toaster,
            resource: Resource::new(),
        }
    }

    #[must_use]
    pub const fn resource(&self) -> &Resource<Vec<Order>> {
        &self.resource
    }

    /// Fetch the first page, newest first.
    ///
    /// Signed-out users get an empty, settled list without a request.
    ///
    /// # Errors
    ///
    /// Returns the API error; the previous list stays published.
    #[instrument(skip(self))]
    pub async fn load(&self, is_authenticated: bool) -> Result<()> {
        if !is_authenticated {
            self.resource.set(Vec::new());
            return Ok(());
        }

        self.resource
            .load(async {
                let page = self.orders.list(&OrderQuery::recent()).await.into_result()?;
                Ok(page.data)
            })
            .await
    }

    /// Same as [`Self::load`].
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub async fn refresh(&self, is_authenticated: bool) -> Result<()> {
        self.load(is_authenticated).await
    }

    /// Edit the published orders without refetching.
    pub fn mutate(&self, f: impl FnOnce(&mut Vec<Order>)) {
        self.resource.mutate(f);
    }

    /// Cancel an order and mark it cancelled locally.
    ///
    /// # Errors
    ///
    /// Returns the API error after showing it as a toast.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: &OrderId) -> Result<()> {
        match self.orders.cancel(id.as_str()).await.into_result() {
            Ok(_) => {
                self.toaster.success(CANCEL_SUCCESS);
                self.mutate(|orders| {
                    for order in orders.iter_mut().filter(|o| &o.id == id) {
                        order.status = OrderStatus::Cancelled;
                    }
                });
                Ok(())
            }
            Err(error) => {
                error.report();
                let message = error.to_string();
                self.toaster.error(if message.is_empty() {
                    CANCEL_FAILURE.to_string()
                } else {
                    message
                });
                Err(error)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use url::Url;

    use super::*;
    use crate::api::ApiClient;
    use crate::storage::{MemoryStore, TokenStore};

    fn offline_loader() -> OrdersLoader {
        let tokens = TokenStore::new(Arc::new(MemoryStore::new()));
        let client = ApiClient::new(&Url::parse("http://127.0.0.1:9").unwrap(), tokens);
        OrdersLoader::new(OrderService::new(client), Toaster::new())
    }

    #[tokio::test]
    async fn test_signed_out_settles_empty_without_request() {
        let loader = offline_loader();
        assert!(loader.resource().is_loading());

        loader.load(false).await.unwrap();

        let snapshot = loader.resource().snapshot();
        assert!(!snapshot.is_loading);
        assert!(snapshot.data.is_empty());
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_is_published() {
        let loader = offline_loader();
        assert!(loader.load(true).await.is_err());

        let snapshot = loader.resource().snapshot();
        assert!(!snapshot.is_loading);
        assert!(snapshot.error.is_some());
    }
}
