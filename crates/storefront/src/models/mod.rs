//! Domain models shared by the API services and the state containers.
//!
//! These are plain records; the only invariants enforced are their shapes.
//! Relationships (cart line ↔ product, order ↔ items) are by identifier
//! string and are not validated.

pub mod cart;
pub mod chat;
pub mod history;
pub mod order;
pub mod product;
pub mod timestamp;
pub mod user;

pub use cart::{LineItem, LineItems};
pub use chat::{ChatMessage, ContextInfo};
pub use history::{Acquisition, AcquisitionItem, SessionSummary};
pub use order::{Order, OrderCreate, OrderItem, OrderItemCreate, OrderQuery};
pub use product::{Page, Product, ProductCreate, ProductQuery, ProductUpdate};
pub use user::{AuthResponse, User, UserCreate};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    use baiyit_core::{Email, Price, ProductId, UserId, UserRole};
    use chrono::{TimeZone, Utc};

    use super::*;

    pub(crate) fn sample_user() -> User {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        User {
            id: UserId::new("user-1"),
            email: Email::parse("user@example.com").unwrap(),
            first_name: "Ada".to_string(),
            last_name: "Shopper".to_string(),
            phone: None,
            avatar: None,
            role: UserRole::Customer,
            is_suspended: false,
            created_at: at,
            updated_at: at,
        }
    }

    pub(crate) fn sample_auth_response(expires_at: i64) -> AuthResponse {
        AuthResponse {
            token_type: "Bearer".to_string(),
            access_token: "access-abc".to_string(),
            expires_at,
            refresh_token: "refresh-xyz".to_string(),
            refresh_token_expires_at: expires_at + 86_400,
            user: sample_user(),
        }
    }

    pub(crate) fn line(id: &str, cents: i64, quantity: u32) -> LineItem {
        LineItem {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(cents),
            image: String::new(),
            quantity,
        }
    }
}
