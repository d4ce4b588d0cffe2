//! The full-page concierge chat.
//!
//! Like the assistant overlay, but bound to a [`SessionContext`] session,
//! accepting image attachments, and answering with real catalog results when
//! a product service is available.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use baiyit_core::{MessageId, SessionId};
use tokio::sync::watch;
use tracing::instrument;

use super::SessionContext;
use crate::api::ProductService;
use crate::assistant::rules::{CONCIERGE_GREETING, IMAGE_REPLY};
use crate::assistant::{CONCIERGE_RULES, PRODUCT_MATCH_RULES, extract_search_term};
use crate::models::{ChatMessage, ProductQuery};

/// Number of catalog results quoted in a reply.
const SEARCH_SIZE: u32 = 3;

/// Published concierge state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConciergeState {
    pub session_id: SessionId,
    pub messages: Vec<ChatMessage>,
    pub is_loading: bool,
}

/// Concierge chat container.
#[derive(Clone)]
pub struct ConciergeChat {
    inner: Arc<ConciergeChatInner>,
}

struct ConciergeChatInner {
    sessions: SessionContext,
    products: Option<ProductService>,
    delay: Duration,
    in_flight: AtomicUsize,
    state: watch::Sender<ConciergeState>,
}

impl ConciergeChat {
    /// Open the current session of `sessions`.
    ///
    /// Without a `products` service every reply comes from the rule table.
    #[must_use]
    pub fn new(sessions: SessionContext, products: Option<ProductService>, delay: Duration) -> Self {
        let session_id = sessions.current_session_id();
        let (state, _) = watch::channel(ConciergeState {
            session_id: session_id.clone(),
            messages: Vec::new(),
            is_loading: false,
        });

        let chat = Self {
            inner: Arc::new(ConciergeChatInner {
                sessions,
                products,
                delay,
                in_flight: AtomicUsize::new(0),
                state,
            }),
        };
        chat.open_session(session_id);
        chat
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ConciergeState> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> ConciergeState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.inner.state.borrow().messages.clone()
    }

    /// Load a session's transcript, seeding the greeting if it has none.
    ///
    /// The seeded greeting stays in memory; a session is only written once
    /// the first message is sent.
    pub fn open_session(&self, session_id: SessionId) {
        let messages = self
            .inner
            .sessions
            .get_session_messages(&session_id)
            .filter(|messages| !messages.is_empty())
            .unwrap_or_else(|| vec![greeting()]);

        self.inner.state.send_replace(ConciergeState {
            session_id,
            messages,
            is_loading: false,
        });
    }

    /// Send a message, optionally with an image reference, and wait for the reply.
    ///
    /// Returns `None` without doing anything if there is neither text nor image.
    #[instrument(skip(self, text), fields(has_image = image.is_some()))]
    pub async fn send_message(&self, text: &str, image: Option<String>) -> Option<ChatMessage> {
        if text.trim().is_empty() && image.is_none() {
            return None;
        }

        let has_image = image.is_some();
        let mut user_message = ChatMessage::user(text);
        user_message.image = image;

        self.inner.in_flight.fetch_add(1, Ordering::SeqCst);
        self.update(|state| {
            state.messages.push(user_message);
            state.is_loading = true;
        });

        tokio::time::sleep(self.inner.delay).await;
        let reply = ChatMessage::ai(self.reply_to(text, has_image).await);

        let remaining = self
            .inner
            .in_flight
            .fetch_sub(1, Ordering::SeqCst)
            .saturating_sub(1);
        self.update(|state| {
            state.messages.push(reply.clone());
            state.is_loading = remaining > 0;
        });

        Some(reply)
    }

    async fn reply_to(&self, text: &str, has_image: bool) -> String {
        if has_image {
            return IMAGE_REPLY.to_string();
        }

        if let Some(products) = &self.inner.products {
            let term = extract_search_term(text);
            if !term.is_empty() {
                let query = ProductQuery {
                    search: Some(term),
                    size: Some(SEARCH_SIZE),
                    ..ProductQuery::default()
                };
                match products.list(&query).await.into_result() {
                    Ok(page) if !page.data.is_empty() => {
                        if let Some(reply) = PRODUCT_MATCH_RULES.respond(text, None, &page.data) {
                            return reply;
                        }
                    }
                    Ok(_) => {}
                    Err(error) => {
                        tracing::warn!(%error, "Product search for chat failed");
                    }
                }
            }
        }

        CONCIERGE_RULES
            .respond(text, None, &[])
            .unwrap_or_default()
    }

    fn update(&self, f: impl FnOnce(&mut ConciergeState)) {
        let sessions = &self.inner.sessions;
        self.inner.state.send_modify(|state| {
            f(state);
            sessions.save_session(&state.session_id, &state.messages);
        });
    }
}

fn greeting() -> ChatMessage {
    let mut message = ChatMessage::ai(CONCIERGE_GREETING);
    message.id = MessageId::new("1");
    message
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use baiyit_core::Sender;

    use super::*;
    use crate::storage::{MemoryStore, SharedStore};

    fn chat() -> (SessionContext, ConciergeChat) {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let sessions = SessionContext::new(store);
        let chat = ConciergeChat::new(sessions.clone(), None, Duration::ZERO);
        (sessions, chat)
    }

    #[test]
    fn test_new_session_starts_with_greeting() {
        let (sessions, chat) = chat();
        let messages = chat.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id.as_str(), "1");
        assert_eq!(messages[0].sender, Sender::Ai);
        assert_eq!(
            sessions.get_session_messages(&sessions.current_session_id()),
            None
        );
    }

    #[tokio::test]
    async fn test_first_send_saves_greeting_with_exchange() {
        let (sessions, chat) = chat();
        chat.send_message("hello", None).await.unwrap();

        let saved = sessions
            .get_session_messages(&sessions.current_session_id())
            .unwrap();
        assert_eq!(saved.len(), 3);
        assert_eq!(saved[0].id.as_str(), "1");
    }

    #[tokio::test]
    async fn test_image_gets_image_reply() {
        let (_, chat) = chat();
        let reply = chat
            .send_message("", Some("uploads/sneaker.png".to_string()))
            .await
            .unwrap();
        assert_eq!(reply.text, IMAGE_REPLY);

        let messages = chat.messages();
        assert_eq!(messages[1].image.as_deref(), Some("uploads/sneaker.png"));
    }

    #[tokio::test]
    async fn test_empty_input_is_ignored() {
        let (_, chat) = chat();
        assert!(chat.send_message("  ", None).await.is_none());
        assert_eq!(chat.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_rule_reply_without_catalog() {
        let (sessions, chat) = chat();
        let reply = chat.send_message("I want a new phone", None).await.unwrap();
        assert!(reply.text.contains("Pixel 7"));

        let saved = sessions
            .get_session_messages(&sessions.current_session_id())
            .unwrap();
        assert_eq!(saved.len(), 3);
        assert!(!chat.state().is_loading);
    }

    #[tokio::test]
    async fn test_reopening_a_session_restores_it() {
        let (sessions, chat) = chat();
        chat.send_message("compare", None).await;
        let id = sessions.current_session_id();

        let other = sessions.set_current_session_id(Some(SessionId::new("session_other")));
        chat.open_session(other);
        assert_eq!(chat.messages().len(), 1);

        chat.open_session(id);
        assert_eq!(chat.messages().len(), 3);
    }
}
