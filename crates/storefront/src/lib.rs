//! Baiyit storefront client library.
//!
//! The client-side layer behind the Baiyit shopping front ends: an HTTP
//! wrapper for the backend API, authentication with one-time codes, cart and
//! bag state, a rule-driven shopping assistant, data loaders and a route gate
//! for account pages. Front ends (the `baiyit` CLI, tests) drive it through
//! [`state::Storefront`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod assistant;
pub mod config;
pub mod error;
pub mod loaders;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod state;
pub mod storage;

pub use config::StorefrontConfig;
pub use error::{Result, StorefrontError, ValidationError};
pub use state::Storefront;
