//! Persisted key names.
//!
//! These match the keys the web storefront kept in browser local storage, so
//! an exported browser profile can be imported as-is.

/// Bearer token for authenticated API calls.
pub const ACCESS_TOKEN: &str = "access_token";

/// Token used to obtain a new access token.
pub const REFRESH_TOKEN: &str = "refresh_token";

/// Access token expiry, epoch seconds.
pub const TOKEN_EXPIRES_AT: &str = "token_expires_at";

/// Refresh token expiry, epoch seconds.
pub const REFRESH_TOKEN_EXPIRES_AT: &str = "refresh_token_expires_at";

/// JSON-encoded logged-in user.
pub const USER: &str = "user";

/// Mirrored `access_token` cookie, as a `Set-Cookie` value.
pub const ACCESS_TOKEN_COOKIE: &str = "cookie:access_token";

/// Cart line items.
pub const CART: &str = "cart";

/// Bag line items.
pub const BAG: &str = "bag";

/// Assistant overlay transcript.
pub const ASSISTANT_MESSAGES: &str = "ai_assistant_messages";

/// Key holding the transcript of a concierge chat session.
#[must_use]
pub fn session(id: &str) -> String {
    format!("session_{id}")
}

/// Every key cleared on logout.
pub const AUTH_KEYS: [&str; 5] = [
    ACCESS_TOKEN,
    REFRESH_TOKEN,
    TOKEN_EXPIRES_AT,
    REFRESH_TOKEN_EXPIRES_AT,
    USER,
];
