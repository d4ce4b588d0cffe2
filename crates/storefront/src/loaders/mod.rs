//! Data loaders for the storefront pages.
//!
//! Each loader owns a [`Resource`]: a watch channel carrying the latest
//! [`Loadable`] snapshot. Loads are not retried and a second load started
//! while one is running simply races it; the last to finish wins.

pub mod acquisitions;
mod fixtures;
pub mod orders;
pub mod products;
pub mod recommendations;
pub mod sessions;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::Result;

pub use acquisitions::AcquisitionsLoader;
pub use orders::OrdersLoader;
pub use products::{ProductFilter, ProductsLoader};
pub use recommendations::Recommendations;
pub use sessions::SessionsLoader;

/// A value that is fetched asynchronously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loadable<T> {
    pub is_loading: bool,
    pub data: T,
    /// Message of the last failed load, cleared when a new load starts.
    pub error: Option<String>,
}

impl<T: Default> Default for Loadable<T> {
    /// Nothing fetched yet; loading until the first load settles.
    fn default() -> Self {
        Self {
            is_loading: true,
            data: T::default(),
            error: None,
        }
    }
}

/// Shared, observable [`Loadable`].
pub struct Resource<T> {
    state: Arc<watch::Sender<Loadable<T>>>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Clone + Default> Default for Resource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Default> Resource<T> {
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(Loadable::default());
        Self {
            state: Arc::new(state),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Loadable<T>> {
        self.state.subscribe()
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Loadable<T> {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn data(&self) -> T {
        self.state.borrow().data.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Run `fetch`, publishing its outcome.
    ///
    /// On success the data is replaced. On failure the previous data is kept
    /// and the error message is published. Loading is cleared however the
    /// load ends, including when the future is dropped mid-flight.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `fetch`.
    pub async fn load<F>(&self, fetch: F) -> Result<()>
    where
        F: Future<Output = Result<T>>,
    {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });
        let _settle = Settle(&self.state);

        match fetch.await {
            Ok(data) => {
                self.state.send_modify(|s| s.data = data);
                Ok(())
            }
            Err(error) => {
                error.report();
                let message = error.to_string();
                self.state.send_modify(|s| s.error = Some(message));
                Err(error)
            }
        }
    }

    /// Publish `data` as settled, without fetching.
    pub fn set(&self, data: T) {
        self.state.send_replace(Loadable {
            is_loading: false,
            data,
            error: None,
        });
    }

    /// Edit the data in place.
    pub fn mutate(&self, f: impl FnOnce(&mut T)) {
        self.state.send_modify(|s| f(&mut s.data));
    }
}

/// Clears the loading flag when dropped.
struct Settle<'a, T>(&'a watch::Sender<Loadable<T>>);

impl<T> Drop for Settle<'_, T> {
    fn drop(&mut self) {
        self.0.send_modify(|s| s.is_loading = false);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{StorefrontError, ValidationError};

    #[test]
    fn test_starts_loading_and_empty() {
        let resource: Resource<Vec<u32>> = Resource::new();
        let snapshot = resource.snapshot();
        assert!(snapshot.is_loading);
        assert!(snapshot.data.is_empty());
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_load_success_replaces_data() {
        let resource: Resource<Vec<u32>> = Resource::new();
        resource.load(async { Ok(vec![1, 2, 3]) }).await.unwrap();

        let snapshot = resource.snapshot();
        assert!(!snapshot.is_loading);
        assert_eq!(snapshot.data, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_data() {
        let resource: Resource<Vec<u32>> = Resource::new();
        resource.set(vec![7]);

        let result = resource
            .load(async { Err(StorefrontError::from(ValidationError::AuthRequired)) })
            .await;
        assert!(result.is_err());

        let snapshot = resource.snapshot();
        assert!(!snapshot.is_loading);
        assert_eq!(snapshot.data, vec![7]);
        assert_eq!(
            snapshot.error.as_deref(),
            Some("You must be logged in to do that")
        );

        resource.load(async { Ok(vec![8]) }).await.unwrap();
        assert!(resource.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn test_dropped_load_clears_loading() {
        let resource: Resource<Vec<u32>> = Resource::new();
        resource.set(Vec::new());

        let pending = resource.load(std::future::pending());
        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(10), pending).await;
        assert!(timed_out.is_err());
        assert!(!resource.is_loading());
    }

    #[test]
    fn test_mutate_edits_in_place() {
        let resource: Resource<Vec<u32>> = Resource::new();
        resource.set(vec![1, 2]);
        resource.mutate(|data| data.retain(|n| *n != 1));
        assert_eq!(resource.data(), vec![2]);
    }
}
