//! Client state containers.
//!
//! Each container is a cheap `Clone` handle over `Arc` inner state that
//! publishes snapshots through a `tokio::sync::watch` channel. Mutations go
//! through the container, which persists what needs to survive a restart
//! and reports outcomes as toasts.

pub mod app;
pub mod assistant;
pub mod auth;
pub mod bag;
pub mod cart;
pub mod concierge;
pub mod session;

pub use app::Storefront;
pub use assistant::{AssistantContext, AssistantState, ContextUpdate};
pub use auth::{AuthContext, AuthState};
pub use bag::BagContext;
pub use cart::{CartContext, CartState};
pub use concierge::{ConciergeChat, ConciergeState};
pub use session::SessionContext;
