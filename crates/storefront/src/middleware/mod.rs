//! HTTP middleware for pages served on top of the storefront layer.

pub mod route_guard;

pub use route_guard::{RouteDecision, evaluate, route_guard};
