//! Account and authentication records.

use baiyit_core::{Email, UserId, UserRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A storefront account as returned by `/auth/me` and the login endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub is_suspended: bool,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// First and last name joined, trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Registration payload.
#[derive(Debug, Clone, Serialize)]
pub struct UserCreate {
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
}

/// Token pair issued by `/auth/verify-otp` and `/auth/refresh`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub access_token: String,
    /// Access token expiry, epoch seconds.
    pub expires_at: i64,
    pub refresh_token: String,
    /// Refresh token expiry, epoch seconds.
    pub refresh_token_expires_at: i64,
    pub user: User,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}
