//! Index of past concierge conversations.

use std::time::Duration;

use super::{Resource, fixtures};
use crate::error::Result;
use crate::models::SessionSummary;

/// Loads the (mocked) session index.
#[derive(Clone)]
pub struct SessionsLoader {
    resource: Resource<Vec<SessionSummary>>,
    delay: Duration,
}

impl SessionsLoader {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            resource: Resource::new(),
            delay,
        }
    }

    #[must_use]
    pub const fn resource(&self) -> &Resource<Vec<SessionSummary>> {
        &self.resource
    }

    /// # Errors
    ///
    /// Never fails today; the index has no backend endpoint yet.
    pub async fn load(&self) -> Result<()> {
        let delay = self.delay;
        self.resource
            .load(async move {
                tokio::time::sleep(delay).await;
                Ok(fixtures::sessions())
            })
            .await
    }
}
