//! Cart state: line items, the drawer, and checkout.

use std::sync::Arc;

use baiyit_core::{Price, ProductId};
use tokio::sync::watch;
use tracing::instrument;

use crate::api::OrderService;
use crate::error::{self, Result, ValidationError};
use crate::models::{LineItem, LineItems, Order, OrderCreate};
use crate::notify::Toaster;
use crate::storage::{self, SharedStore, keys};

/// Published cart state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    pub items: LineItems,
    /// Whether the cart drawer is showing.
    pub is_open: bool,
}

/// Cart state container, persisted under `cart` after every change.
#[derive(Clone)]
pub struct CartContext {
    inner: Arc<CartContextInner>,
}

struct CartContextInner {
    store: SharedStore,
    toaster: Toaster,
    state: watch::Sender<CartState>,
}

impl CartContext {
    /// Create the container, rehydrating any saved cart.
    #[must_use]
    pub fn new(store: SharedStore, toaster: Toaster) -> Self {
        let items = LineItems::from(storage::load_list::<LineItem>(store.as_ref(), keys::CART));
        let (state, _) = watch::channel(CartState {
            items,
            is_open: false,
        });

        Self {
            inner: Arc::new(CartContextInner {
                store,
                toaster,
                state,
            }),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> CartState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn items(&self) -> LineItems {
        self.inner.state.borrow().items.clone()
    }

    #[must_use]
    pub fn total(&self) -> Price {
        self.inner.state.borrow().items.total()
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.inner.state.borrow().items.item_count()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.state.borrow().is_open
    }

    /// Add a line (merging by id) and open the drawer.
    pub fn add_item(&self, item: LineItem) {
        error::add_breadcrumb(
            "cart",
            "Added item",
            Some(&[("product_id", item.id.as_str())]),
        );
        self.update(|state| {
            state.items.add(item);
            state.is_open = true;
        });
    }

    pub fn remove_item(&self, id: &ProductId) {
        self.update(|state| {
            state.items.remove(id);
        });
    }

    /// Replace a line's quantity. Unknown ids are ignored.
    pub fn update_quantity(&self, id: &ProductId, quantity: u32) {
        self.update(|state| {
            state.items.update_quantity(id, quantity);
        });
    }

    pub fn clear(&self) {
        self.update(|state| state.items.clear());
    }

    pub fn open(&self) {
        self.inner.state.send_modify(|state| state.is_open = true);
    }

    pub fn close(&self) {
        self.inner.state.send_modify(|state| state.is_open = false);
    }

    /// Check that checkout can proceed, toasting the reason if not.
    ///
    /// # Errors
    ///
    /// `NotLoggedIn` when signed out, `CartEmpty` when there is nothing to buy.
    pub fn checkout_ready(&self, is_authenticated: bool) -> std::result::Result<(), ValidationError> {
        let result = if !is_authenticated {
            Err(ValidationError::NotLoggedIn)
        } else if self.inner.state.borrow().items.is_empty() {
            Err(ValidationError::CartEmpty)
        } else {
            Ok(())
        };

        if let Err(e) = &result {
            self.inner.toaster.error(e.to_string());
        }
        result
    }

    /// Submit the cart as an order and empty it on success.
    ///
    /// Validation happens before any request is made.
    ///
    /// # Errors
    ///
    /// Returns the validation error or the API error; the cart is left intact.
    #[instrument(skip(self, orders))]
    pub async fn place_order(&self, orders: &OrderService, is_authenticated: bool) -> Result<Order> {
        self.checkout_ready(is_authenticated)?;

        let payload = OrderCreate::from(&self.inner.state.borrow().items);
        match orders.create(&payload).await.into_result() {
            Ok(order) => {
                error::add_breadcrumb("cart", "Placed order", Some(&[("order_id", order.id.as_str())]));
                self.clear();
                self.close();
                self.inner.toaster.success("Order placed successfully");
                Ok(order)
            }
            Err(e) => {
                self.inner.toaster.failure(&e);
                Err(e)
            }
        }
    }

    fn update(&self, f: impl FnOnce(&mut CartState)) {
        let store = &self.inner.store;
        self.inner.state.send_modify(|state| {
            f(state);
            storage::persist(store.as_ref(), keys::CART, &state.items);
        });
    }
}
