//! Baiyit Core - Shared types library.
//!
//! This crate provides common types used across all Baiyit components:
//! - `storefront` - Client-side state, session and request layer
//! - `cli` - Command-line front end driving the storefront layer
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
