//! Backend HTTP API.
//!
//! [`ApiClient`] is the only place that talks HTTP. The services layer typed
//! endpoints over it and never fail with anything but the uniform
//! [`ApiResponse`] shape.

pub mod auth;
pub mod client;
pub mod orders;
pub mod products;

pub use auth::AuthService;
pub use client::{ApiClient, ApiResponse, RequestOptions};
pub use orders::OrderService;
pub use products::ProductService;
