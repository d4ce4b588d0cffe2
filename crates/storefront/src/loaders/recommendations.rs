//! Product recommendations derived from a conversation.
//!
//! Everything the shopper has said so far is matched against an ordered
//! keyword table; the first hit picks a product set, and trending products
//! fill in when nothing matches.

use std::sync::Arc;

use baiyit_core::Sender;
use tokio::sync::watch;

use super::fixtures;
use crate::models::{ChatMessage, Product};

/// `(keywords, product set)`, evaluated first-match.
type RecommendationRule = (&'static [&'static str], fn() -> Vec<Product>);

const RECOMMENDATION_RULES: &[RecommendationRule] = &[
    (&["laptop", "computer"], fixtures::laptops),
    (&["phone", "smartphone"], fixtures::phones),
    (&["headphone", "earbuds"], fixtures::audio),
];

/// Recommendations for a transcript, or `None` when the last message is not
/// an assistant reply (nothing new to react to).
#[must_use]
pub fn recommend(messages: &[ChatMessage]) -> Option<Vec<Product>> {
    if !messages.last()?.is_from_ai() {
        return None;
    }

    let said = messages
        .iter()
        .filter(|m| m.sender == Sender::User)
        .map(|m| m.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let products = RECOMMENDATION_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| said.contains(k)))
        .map_or_else(fixtures::trending, |(_, products)| products());
    Some(products)
}

/// Observable recommendation list.
#[derive(Clone)]
pub struct Recommendations {
    products: Arc<watch::Sender<Vec<Product>>>,
}

impl Default for Recommendations {
    fn default() -> Self {
        Self::new()
    }
}

impl Recommendations {
    #[must_use]
    pub fn new() -> Self {
        let (products, _) = watch::channel(Vec::new());
        Self {
            products: Arc::new(products),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Product>> {
        self.products.subscribe()
    }

    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.products.borrow().clone()
    }

    /// Recompute from `messages`; the list is left as is unless the last
    /// message came from the assistant.
    pub fn update(&self, messages: &[ChatMessage]) {
        if let Some(products) = recommend(messages) {
            self.products.send_replace(products);
        }
    }
}
