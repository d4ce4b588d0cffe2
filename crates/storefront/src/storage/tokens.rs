//! Auth token persistence.
//!
//! Owns the five auth keys plus the mirrored `access_token` cookie record that
//! the route gate reads.

use secrecy::SecretString;

use super::{SharedStore, StorageError, StorageExt, keys};
use crate::models::{AuthResponse, User};

/// Name of the cookie mirroring the access token.
pub const ACCESS_TOKEN_COOKIE_NAME: &str = "access_token";

/// Typed view over the auth keys of a store.
#[derive(Clone)]
pub struct TokenStore {
    store: SharedStore,
}

impl TokenStore {
    /// Wrap a shared store.
    #[must_use]
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Persist a fresh token pair and user, and mirror the access token cookie.
    ///
    /// # Errors
    ///
    /// Returns an error if any key cannot be written.
    pub fn save(&self, auth: &AuthResponse, now: i64) -> Result<(), StorageError> {
        self.store.set(keys::ACCESS_TOKEN, &auth.access_token)?;
        self.store.set(keys::REFRESH_TOKEN, &auth.refresh_token)?;
        self.store
            .set(keys::TOKEN_EXPIRES_AT, &auth.expires_at.to_string())?;
        self.store.set(
            keys::REFRESH_TOKEN_EXPIRES_AT,
            &auth.refresh_token_expires_at.to_string(),
        )?;
        self.store.set_json(keys::USER, &auth.user)?;

        let max_age = auth.expires_at.saturating_sub(now).max(0);
        self.store.set(
            keys::ACCESS_TOKEN_COOKIE,
            &access_token_cookie(&auth.access_token, max_age),
        )
    }

    /// Remove every auth key and expire the mirrored cookie.
    ///
    /// # Errors
    ///
    /// Returns an error if any key cannot be removed.
    pub fn clear(&self) -> Result<(), StorageError> {
        for key in keys::AUTH_KEYS {
            self.store.remove(key)?;
        }
        self.store
            .set(keys::ACCESS_TOKEN_COOKIE, &access_token_cookie("", 0))
    }

    /// Whether a token is stored and its expiry is still in the future.
    ///
    /// Only presence and expiry are checked; the token itself is opaque.
    #[must_use]
    pub fn is_authenticated_at(&self, now: i64) -> bool {
        let Ok(Some(_)) = self.store.get(keys::ACCESS_TOKEN) else {
            return false;
        };
        self.expires_at().is_some_and(|expires_at| now < expires_at)
    }

    /// [`Self::is_authenticated_at`] against the current clock.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(chrono::Utc::now().timestamp())
    }

    /// Stored access token expiry, epoch seconds.
    #[must_use]
    pub fn expires_at(&self) -> Option<i64> {
        read_epoch(&self.store, keys::TOKEN_EXPIRES_AT)
    }

    /// Stored refresh token expiry, epoch seconds.
    #[must_use]
    pub fn refresh_token_expires_at(&self) -> Option<i64> {
        read_epoch(&self.store, keys::REFRESH_TOKEN_EXPIRES_AT)
    }

    /// The access token, if one is stored.
    #[must_use]
    pub fn access_token(&self) -> Option<SecretString> {
        self.store
            .get(keys::ACCESS_TOKEN)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
            .map(SecretString::from)
    }

    /// The refresh token, if one is stored.
    #[must_use]
    pub fn refresh_token(&self) -> Option<SecretString> {
        self.store
            .get(keys::REFRESH_TOKEN)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
            .map(SecretString::from)
    }

    /// The cached user, if present and readable.
    #[must_use]
    pub fn stored_user(&self) -> Option<User> {
        match self.store.get_json::<User>(keys::USER) {
            Ok(user) => user,
            Err(error) => {
                tracing::warn!(%error, "Stored user is unreadable");
                None
            }
        }
    }

    /// Replace the cached user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user cannot be written.
    pub fn store_user(&self, user: &User) -> Result<(), StorageError> {
        self.store.set_json(keys::USER, user)
    }

    /// The mirrored cookie record, as a `Set-Cookie` value.
    #[must_use]
    pub fn cookie(&self) -> Option<String> {
        self.store.get(keys::ACCESS_TOKEN_COOKIE).ok().flatten()
    }
}

/// Format the `Set-Cookie` value mirroring the access token.
#[must_use]
pub fn access_token_cookie(token: &str, max_age: i64) -> String {
    format!("{ACCESS_TOKEN_COOKIE_NAME}={token}; Path=/; Max-Age={max_age}")
}

fn read_epoch(store: &SharedStore, key: &str) -> Option<i64> {
    store
        .get(key)
        .ok()
        .flatten()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
}
