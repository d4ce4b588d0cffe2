//! Purchase history shown on the acquisitions page.

use std::time::Duration;

use super::{Resource, fixtures};
use crate::error::Result;
use crate::models::Acquisition;

/// Loads the (mocked) purchase history.
#[derive(Clone)]
pub struct AcquisitionsLoader {
    resource: Resource<Vec<Acquisition>>,
    delay: Duration,
}

impl AcquisitionsLoader {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            resource: Resource::new(),
            delay,
        }
    }

    #[must_use]
    pub const fn resource(&self) -> &Resource<Vec<Acquisition>> {
        &self.resource
    }

    /// # Errors
    ///
    /// Never fails today; history has no backend endpoint yet.
    pub async fn load(&self) -> Result<()> {
        let delay = self.delay;
        self.resource
            .load(async move {
                tokio::time::sleep(delay).await;
                Ok(fixtures::acquisitions())
            })
            .await
    }
}
