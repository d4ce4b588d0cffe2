//! The assistant overlay: modal state, transcript, and mock replies.
//!
//! Each send waits out the simulated latency on its own. Concurrent sends are
//! not serialized, so replies land in completion order and `is_loading` stays
//! set until the last one is in.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::instrument;

use crate::assistant::ASSISTANT_RULES;
use crate::assistant::rules::ERROR_REPLY;
use crate::models::{ChatMessage, ContextInfo, Product};
use crate::storage::{self, KeyValueStore, SharedStore, keys};

/// Published assistant state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantState {
    pub is_open: bool,
    pub messages: Vec<ChatMessage>,
    /// Unsent text in the input box.
    pub input: String,
    pub context_info: ContextInfo,
    pub is_loading: bool,
    /// Product opened from a suggestion.
    pub selected_product: Option<Product>,
}

/// Partial [`ContextInfo`] update; unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextUpdate {
    pub page: Option<String>,
    pub path: Option<String>,
    /// `Some(None)` clears the product.
    pub product: Option<Option<Product>>,
}

impl ContextUpdate {
    #[must_use]
    pub fn page(page: impl Into<String>) -> Self {
        Self {
            page: Some(page.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_product(mut self, product: Option<Product>) -> Self {
        self.product = Some(product);
        self
    }

    fn apply(self, info: &mut ContextInfo) {
        if let Some(page) = self.page {
            info.page = page;
        }
        if let Some(path) = self.path {
            info.path = Some(path);
        }
        if let Some(product) = self.product {
            info.product = product;
        }
    }
}

/// Assistant state container.
#[derive(Clone)]
pub struct AssistantContext {
    inner: Arc<AssistantContextInner>,
}

struct AssistantContextInner {
    store: SharedStore,
    delay: Duration,
    in_flight: AtomicUsize,
    state: watch::Sender<AssistantState>,
}

impl AssistantContext {
    /// Create the container, rehydrating the saved transcript.
    #[must_use]
    pub fn new(store: SharedStore, delay: Duration) -> Self {
        let messages = storage::load_list::<ChatMessage>(store.as_ref(), keys::ASSISTANT_MESSAGES);
        let (state, _) = watch::channel(AssistantState {
            messages,
            ..AssistantState::default()
        });

        Self {
            inner: Arc::new(AssistantContextInner {
                store,
                delay,
                in_flight: AtomicUsize::new(0),
                state,
            }),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AssistantState> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> AssistantState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.inner.state.borrow().messages.clone()
    }

    pub fn open(&self) {
        self.inner.state.send_modify(|s| s.is_open = true);
    }

    pub fn close(&self) {
        self.inner.state.send_modify(|s| s.is_open = false);
    }

    pub fn set_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner.state.send_modify(|s| s.input = text);
    }

    pub fn update_context_info(&self, update: ContextUpdate) {
        self.inner
            .state
            .send_modify(|s| update.apply(&mut s.context_info));
    }

    pub fn select_product(&self, product: Product) {
        self.inner
            .state
            .send_modify(|s| s.selected_product = Some(product));
    }

    pub fn clear_selected_product(&self) {
        self.inner.state.send_modify(|s| s.selected_product = None);
    }

    /// Send a message and wait for the reply.
    ///
    /// The reply is chosen with the page context as it was when the message
    /// was sent. Blank messages are ignored and return `None`.
    #[instrument(skip(self, text))]
    pub async fn send_message(&self, text: &str) -> Option<ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }

        let user_message = ChatMessage::user(text);
        let mut context = None;
        self.inner.in_flight.fetch_add(1, Ordering::SeqCst);
        self.update_messages(|s| {
            context = Some(s.context_info.clone());
            s.input.clear();
            s.messages.push(user_message);
            s.is_loading = true;
        });

        tokio::time::sleep(self.inner.delay).await;

        let reply = ASSISTANT_RULES
            .respond(text, context.as_ref(), &[])
            .unwrap_or_else(|| ERROR_REPLY.to_string());
        let reply = ChatMessage::ai(reply);

        let remaining = self
            .inner
            .in_flight
            .fetch_sub(1, Ordering::SeqCst)
            .saturating_sub(1);
        self.update_messages(|s| {
            s.messages.push(reply.clone());
            s.is_loading = remaining > 0;
        });

        Some(reply)
    }

    /// Forget the transcript, in memory and in storage.
    pub fn clear_messages(&self) {
        self.inner.state.send_modify(|s| s.messages.clear());
        if let Err(error) = self.inner.store.remove(keys::ASSISTANT_MESSAGES) {
            tracing::warn!(%error, "Failed to clear assistant transcript");
        }
    }

    /// Apply a change and persist the transcript if it is non-empty.
    fn update_messages(&self, f: impl FnOnce(&mut AssistantState)) {
        let store = &self.inner.store;
        self.inner.state.send_modify(|s| {
            f(s);
            if !s.messages.is_empty() {
                storage::persist(store.as_ref(), keys::ASSISTANT_MESSAGES, &s.messages);
            }
        });
    }
}
