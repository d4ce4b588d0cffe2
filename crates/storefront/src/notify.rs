//! Transient user notifications ("toasts").
//!
//! State containers report the outcome of user actions here rather than
//! returning UI strings. Whoever renders the storefront subscribes and shows
//! them; with no subscriber, toasts are dropped.

use tokio::sync::broadcast;

use crate::error::StorefrontError;

const TOAST_CAPACITY: usize = 64;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A short human-readable notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl std::fmt::Display for Toast {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ToastKind::Success => write!(f, "✓ {}", self.message),
            ToastKind::Error => write!(f, "✗ {}", self.message),
        }
    }
}

/// Cloneable sender side of the toast channel.
#[derive(Debug, Clone)]
pub struct Toaster {
    tx: broadcast::Sender<Toast>,
}

impl Default for Toaster {
    fn default() -> Self {
        Self::new()
    }
}

impl Toaster {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(TOAST_CAPACITY);
        Self { tx }
    }

    /// Receive every toast sent after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.tx.subscribe()
    }

    pub fn success(&self, message: impl Into<String>) {
        self.send(ToastKind::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(ToastKind::Error, message.into());
    }

    /// Report an error and show its message.
    pub fn failure(&self, error: &StorefrontError) {
        error.report();
        self.error(error.to_string());
    }

    fn send(&self, kind: ToastKind, message: String) {
        tracing::debug!(?kind, %message, "Toast");
        // No receivers is fine.
        let _ = self.tx.send(Toast { kind, message });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[tokio::test]
    async fn test_subscribers_receive_toasts_in_order() {
        let toaster = Toaster::new();
        let mut rx = toaster.subscribe();

        toaster.success("Added to cart");
        toaster.failure(&ValidationError::CartEmpty.into());

        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, ToastKind::Success);
        assert_eq!(first.message, "Added to cart");

        let second = rx.recv().await.unwrap();
        assert_eq!(second.kind, ToastKind::Error);
        assert_eq!(second.to_string(), "✗ Your cart is empty");
    }

    #[test]
    fn test_sending_without_subscribers_is_harmless() {
        Toaster::new().success("nobody listening");
    }
}
