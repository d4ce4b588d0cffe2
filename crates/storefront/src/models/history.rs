//! Purchase history and chat-session summaries shown on the account pages.

use baiyit_core::{AcquisitionId, OrderStatus, Price, ProductId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A past purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acquisition {
    pub id: AcquisitionId,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub date: DateTime<Utc>,
    pub total: Price,
    pub status: OrderStatus,
    pub items: Vec<AcquisitionItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionItem {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub quantity: u32,
    #[serde(default)]
    pub image: String,
}

/// Index entry for a past concierge conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub title: String,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub date: DateTime<Utc>,
    pub preview: String,
    /// Names of the products discussed.
    pub products: Vec<String>,
}
