//! Unified error handling with Sentry integration.
//!
//! Errors fall into three user-facing categories: transport failures, errors
//! reported by the API, and local validation failures. Each renders a short
//! message suitable for a toast notification.

use thiserror::Error;

use crate::storage::StorageError;

/// Application-level error type for the storefront layer.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The request never produced an HTTP response.
    #[error("{0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// Input rejected before any network call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Persisted state could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Locally detected invalid input or state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Your cart is empty")]
    CartEmpty,

    #[error("Please log in to checkout")]
    NotLoggedIn,

    #[error("You must be logged in to do that")]
    AuthRequired,

    #[error("Invalid email address: {0}")]
    InvalidEmail(#[from] baiyit_core::EmailError),

    #[error("{0} cannot be empty")]
    Blank(&'static str),

    #[error("Your session has expired, please log in again")]
    SessionExpired,
}

/// Broad error category, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Api,
    Validation,
    Storage,
}

impl StorefrontError {
    /// Which category this error belongs to.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport(_) => ErrorCategory::Transport,
            Self::Api { .. } => ErrorCategory::Api,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Storage(_) => ErrorCategory::Storage,
        }
    }

    /// HTTP status for API errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the backend rejected our credentials.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }

    /// Log the error and capture the ones we can't blame on the user.
    pub fn report(&self) {
        match self {
            Self::Transport(_) | Self::Storage(_) => {
                let event_id = sentry::capture_error(self);
                tracing::error!(error = %self, sentry_event_id = %event_id, "Storefront error");
            }
            Self::Api { status, .. } => {
                tracing::debug!(error = %self, status, "API rejected request");
            }
            Self::Validation(_) => {
                tracing::debug!(error = %self, "Validation failed");
            }
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Set the Sentry user context after a successful login.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for a user action.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "laptop-1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_toast_ready() {
        assert_eq!(
            StorefrontError::from(ValidationError::CartEmpty).to_string(),
            "Your cart is empty"
        );
        assert_eq!(
            StorefrontError::Api {
                status: 404,
                message: "Order not found".to_string()
            }
            .to_string(),
            "Order not found"
        );
        assert_eq!(
            ValidationError::Blank("Verification code").to_string(),
            "Verification code cannot be empty"
        );
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            StorefrontError::Transport("connection refused".into()).category(),
            ErrorCategory::Transport
        );
        assert_eq!(
            StorefrontError::from(ValidationError::NotLoggedIn).category(),
            ErrorCategory::Validation
        );
        let unauthorized = StorefrontError::Api {
            status: 401,
            message: "expired".into(),
        };
        assert_eq!(unauthorized.category(), ErrorCategory::Api);
        assert_eq!(unauthorized.status(), Some(401));
        assert!(unauthorized.is_unauthorized());
    }
}
