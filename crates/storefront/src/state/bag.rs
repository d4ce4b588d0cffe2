//! Bag state: a second, drawer-less list of line items.
//!
//! Shares the [`LineItems`] reducer with the cart and persists under `bag`.

use std::sync::Arc;

use baiyit_core::{Price, ProductId};
use tokio::sync::watch;

use crate::models::{LineItem, LineItems};
use crate::storage::{self, SharedStore, keys};

/// Bag state container.
#[derive(Clone)]
pub struct BagContext {
    inner: Arc<BagContextInner>,
}

struct BagContextInner {
    store: SharedStore,
    items: watch::Sender<LineItems>,
}

impl BagContext {
    /// Create the container, rehydrating any saved bag.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        let items = LineItems::from(storage::load_list::<LineItem>(store.as_ref(), keys::BAG));
        let (items, _) = watch::channel(items);
        Self {
            inner: Arc::new(BagContextInner { store, items }),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LineItems> {
        self.inner.items.subscribe()
    }

    #[must_use]
    pub fn items(&self) -> LineItems {
        self.inner.items.borrow().clone()
    }

    #[must_use]
    pub fn total(&self) -> Price {
        self.inner.items.borrow().total()
    }

    pub fn add_item(&self, item: LineItem) {
        self.update(|items| items.add(item));
    }

    pub fn remove_item(&self, id: &ProductId) {
        self.update(|items| {
            items.remove(id);
        });
    }

    pub fn update_quantity(&self, id: &ProductId, quantity: u32) {
        self.update(|items| {
            items.update_quantity(id, quantity);
        });
    }

    pub fn clear(&self) {
        self.update(LineItems::clear);
    }

    fn update(&self, f: impl FnOnce(&mut LineItems)) {
        let store = &self.inner.store;
        self.inner.items.send_modify(|items| {
            f(items);
            storage::persist(store.as_ref(), keys::BAG, items);
        });
    }
}
