//! Command implementations.
//!
//! Commands print their results on stdout; outcomes the storefront reports
//! as toasts are printed by the toast listener in `main`.

pub mod auth;
pub mod cart;
pub mod chat;
pub mod history;
pub mod orders;
pub mod products;
pub mod route;

use baiyit_storefront::StorefrontError;
use baiyit_storefront::config::ConfigError;
use baiyit_storefront::storage::StorageError;
use thiserror::Error;

/// Errors that end a command with a non-zero exit status.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not open local state: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    #[error("No product with id {0}")]
    UnknownProduct(String),

    #[error("{0}")]
    Unavailable(&'static str),
}
