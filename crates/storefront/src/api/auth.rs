//! Authentication endpoints.

use serde_json::json;
use tracing::instrument;

use super::{ApiClient, ApiResponse};
use crate::models::{AuthResponse, User, UserCreate};

/// `/auth/*` endpoints.
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Create an account. The user logs in afterwards with an OTP.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn register(&self, user: &UserCreate) -> ApiResponse<User> {
        self.client.post("/auth/register", user, false).await
    }

    /// Email a one-time passcode.
    #[instrument(skip(self))]
    pub async fn request_otp(&self, email: &str) -> ApiResponse<serde_json::Value> {
        self.client
            .post("/auth/request-otp", &json!({ "email": email }), false)
            .await
    }

    /// Exchange an email and passcode for a token pair.
    #[instrument(skip(self, otp))]
    pub async fn verify_otp(&self, email: &str, otp: &str) -> ApiResponse<AuthResponse> {
        self.client
            .post("/auth/verify-otp", &json!({ "email": email, "otp": otp }), false)
            .await
    }

    /// The account behind the stored access token.
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> ApiResponse<User> {
        self.client.get("/auth/me", true).await
    }

    /// Exchange a refresh token for a new token pair.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> ApiResponse<AuthResponse> {
        self.client
            .post(
                "/auth/refresh",
                &json!({ "refresh_token": refresh_token }),
                false,
            )
            .await
    }

    /// Revoke the current session server-side.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> ApiResponse<serde_json::Value> {
        self.client.post("/auth/sign-out", &json!({}), true).await
    }
}
