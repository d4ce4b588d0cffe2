//! Chat messages and the page context the assistant sees.

use std::sync::atomic::{AtomicU64, Ordering};

use baiyit_core::{MessageId, Sender};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Product;

/// Disambiguates ids minted within the same millisecond.
static MESSAGE_SEQ: AtomicU64 = AtomicU64::new(0);

/// One chat message, from the shopper or the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    /// Reference to an attached image (a path or URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ChatMessage {
    /// A message typed by the shopper, stamped now.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::at(Sender::User, text, Utc::now())
    }

    /// An assistant reply, stamped now.
    #[must_use]
    pub fn ai(text: impl Into<String>) -> Self {
        Self::at(Sender::Ai, text, Utc::now())
    }

    /// A message with an explicit timestamp; the id is derived from it.
    #[must_use]
    pub fn at(sender: Sender, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: next_message_id(sender, timestamp),
            sender,
            text: text.into(),
            timestamp,
            image: None,
        }
    }

    /// Attach an image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    #[must_use]
    pub fn is_from_ai(&self) -> bool {
        self.sender == Sender::Ai
    }
}

/// `user_<millis>_<seq>` or `ai_<millis>_<seq>`.
fn next_message_id(sender: Sender, timestamp: DateTime<Utc>) -> MessageId {
    let prefix = match sender {
        Sender::User => "user",
        Sender::Ai => "ai",
    };
    let seq = MESSAGE_SEQ.fetch_add(1, Ordering::Relaxed);
    MessageId::new(format!("{prefix}_{}_{seq}", timestamp.timestamp_millis()))
}

/// What the shopper is currently looking at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextInfo {
    /// Page kind, e.g. `home`, `products`, `product`.
    pub page: String,
    #[serde(default)]
    pub path: Option<String>,
    /// The product on screen, for product pages.
    #[serde(default)]
    pub product: Option<Product>,
}

impl Default for ContextInfo {
    fn default() -> Self {
        Self {
            page: "home".to_string(),
            path: None,
            product: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_ids_carry_sender_and_millis() {
        let at = Utc.with_ymd_and_hms(2023, 4, 15, 10, 30, 0).unwrap();
        let user = ChatMessage::at(Sender::User, "hi", at);
        let ai = ChatMessage::at(Sender::Ai, "hello", at);

        assert!(user.id.as_str().starts_with("user_1681554600000_"));
        assert!(ai.id.as_str().starts_with("ai_1681554600000_"));
        assert!(ai.is_from_ai());
        assert!(!user.is_from_ai());
    }

    #[test]
    fn test_ids_are_unique_within_a_millisecond() {
        let at = Utc::now();
        let a = ChatMessage::at(Sender::User, "a", at);
        let b = ChatMessage::at(Sender::User, "b", at);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_json_shape() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let message = ChatMessage::at(Sender::User, "look", at).with_image("shoe.png");
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["sender"], "user");
        assert_eq!(json["image"], "shoe.png");
        assert_eq!(json["timestamp"], "2024-01-01T00:00:00Z");

        let plain = serde_json::to_value(ChatMessage::ai("ok")).unwrap();
        assert!(plain.get("image").is_none());
    }

    #[test]
    fn test_context_defaults_to_home() {
        let context = ContextInfo::default();
        assert_eq!(context.page, "home");
        assert!(context.product.is_none());
    }
}
