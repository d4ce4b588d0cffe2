//! Concierge chat sessions.
//!
//! A session is just an id and a transcript stored under `session_<id>`.

use std::sync::Arc;

use baiyit_core::SessionId;
use tokio::sync::watch;

use crate::models::ChatMessage;
use crate::storage::{SharedStore, StorageExt, keys};

/// Tracks the current session id and reads and writes transcripts.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<SessionContextInner>,
}

struct SessionContextInner {
    store: SharedStore,
    current: watch::Sender<SessionId>,
}

impl SessionContext {
    /// Start with a freshly minted session id.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        let (current, _) = watch::channel(new_session_id());
        Self {
            inner: Arc::new(SessionContextInner { store, current }),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionId> {
        self.inner.current.subscribe()
    }

    #[must_use]
    pub fn current_session_id(&self) -> SessionId {
        self.inner.current.borrow().clone()
    }

    /// Switch sessions. `None` starts a new one.
    pub fn set_current_session_id(&self, id: Option<SessionId>) -> SessionId {
        let id = id.unwrap_or_else(new_session_id);
        self.inner.current.send_replace(id.clone());
        id
    }

    /// Write a transcript. Failures are logged, not returned.
    pub fn save_session(&self, id: &SessionId, messages: &[ChatMessage]) {
        if let Err(error) = self.inner.store.set_json(&keys::session(id.as_str()), messages) {
            tracing::error!(session_id = %id, %error, "Failed to save session");
        }
    }

    /// Read a transcript; `None` when missing or unreadable.
    #[must_use]
    pub fn get_session_messages(&self, id: &SessionId) -> Option<Vec<ChatMessage>> {
        match self
            .inner
            .store
            .get_json::<Vec<ChatMessage>>(&keys::session(id.as_str()))
        {
            Ok(messages) => messages,
            Err(error) => {
                tracing::error!(session_id = %id, %error, "Failed to get session messages");
                None
            }
        }
    }
}

fn new_session_id() -> SessionId {
    SessionId::new(format!(
        "session_{}",
        chrono::Utc::now().timestamp_millis()
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};

    #[test]
    fn test_new_context_mints_an_id() {
        let sessions = SessionContext::new(Arc::new(MemoryStore::new()));
        assert!(sessions.current_session_id().as_str().starts_with("session_"));
    }

    #[test]
    fn test_transcripts_roundtrip_by_id() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let sessions = SessionContext::new(store.clone());
        let id = SessionId::new("abc");

        assert_eq!(sessions.get_session_messages(&id), None);

        let messages = vec![ChatMessage::user("hello"), ChatMessage::ai("hi there")];
        sessions.save_session(&id, &messages);

        assert!(store.get("session_abc").unwrap().is_some());
        assert_eq!(sessions.get_session_messages(&id), Some(messages));
    }

    #[test]
    fn test_unreadable_transcript_is_none() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        store.set("session_bad", "{{").unwrap();
        let sessions = SessionContext::new(store);
        assert_eq!(sessions.get_session_messages(&SessionId::new("bad")), None);
    }

    #[test]
    fn test_switching_sessions() {
        let sessions = SessionContext::new(Arc::new(MemoryStore::new()));
        let mut rx = sessions.subscribe();
        sessions.set_current_session_id(Some(SessionId::new("session_1")));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_str(), "session_1");

        let fresh = sessions.set_current_session_id(None);
        assert_ne!(fresh.as_str(), "session_1");
    }
}
