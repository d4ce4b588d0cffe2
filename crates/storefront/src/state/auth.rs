//! Authentication state.
//!
//! Tracks the logged-in user on top of the [`TokenStore`]. Token expiry only
//! gates `is_authenticated`; nothing refreshes automatically.

use std::sync::Arc;

use baiyit_core::Email;
use secrecy::ExposeSecret;
use tokio::sync::watch;
use tracing::instrument;

use crate::api::AuthService;
use crate::api::client::GENERIC_API_ERROR;
use crate::error::{self, Result, StorefrontError, ValidationError};
use crate::models::{User, UserCreate};
use crate::notify::Toaster;
use crate::storage::TokenStore;

/// Published auth state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    /// True until [`AuthContext::initialize`] has run.
    pub is_loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: true,
        }
    }
}

impl AuthState {
    fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
            is_loading: false,
        }
    }

    const fn signed_out() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            is_loading: false,
        }
    }
}

/// Auth state container.
#[derive(Clone)]
pub struct AuthContext {
    inner: Arc<AuthContextInner>,
}

struct AuthContextInner {
    service: AuthService,
    tokens: TokenStore,
    toaster: Toaster,
    state: watch::Sender<AuthState>,
}

impl AuthContext {
    #[must_use]
    pub fn new(service: AuthService, tokens: TokenStore, toaster: Toaster) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            inner: Arc::new(AuthContextInner {
                service,
                tokens,
                toaster,
                state,
            }),
        }
    }

    /// Observe state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    /// Whether a stored token exists and has not yet expired.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.tokens.is_authenticated()
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    /// Restore the session from storage.
    ///
    /// A valid token with a cached user is trusted as-is. A valid token without
    /// one is checked against `/auth/me`; if that fails the tokens are cleared.
    #[instrument(skip(self))]
    pub async fn initialize(&self) {
        self.inner.state.send_modify(|state| state.is_loading = true);

        if !self.inner.tokens.is_authenticated() {
            self.inner.state.send_replace(AuthState::signed_out());
            return;
        }

        if let Some(user) = self.inner.tokens.stored_user() {
            error::set_sentry_user(&user.id, Some(user.email.as_str()));
            self.inner.state.send_replace(AuthState::signed_in(user));
            return;
        }

        match self.inner.service.current_user().await.into_result() {
            Ok(user) => {
                if let Err(e) = self.inner.tokens.store_user(&user) {
                    tracing::warn!(error = %e, "Failed to cache user");
                }
                error::set_sentry_user(&user.id, Some(user.email.as_str()));
                self.inner.state.send_replace(AuthState::signed_in(user));
            }
            Err(e) => {
                tracing::info!(error = %e, "Stored session rejected, signing out");
                self.clear_tokens();
                self.inner.state.send_replace(AuthState::signed_out());
            }
        }
    }

    /// Email a one-time passcode.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed email (no request is made),
    /// or the API error.
    #[instrument(skip(self))]
    pub async fn request_otp(&self, email: &str) -> Result<()> {
        let result: Result<serde_json::Value> = async {
            let email = Email::parse(email).map_err(ValidationError::from)?;
            self.inner
                .service
                .request_otp(email.as_str())
                .await
                .into_result()
        }
        .await;

        match result {
            Ok(_) => {
                self.inner
                    .toaster
                    .success("Verification code sent to your email");
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Verify a passcode and start a session.
    ///
    /// # Errors
    ///
    /// Returns the API error (typically an invalid or expired code), or a
    /// storage error if the tokens cannot be saved.
    #[instrument(skip(self, otp))]
    pub async fn login(&self, email: &str, otp: &str) -> Result<User> {
        if otp.trim().is_empty() {
            return Err(self.fail(ValidationError::Blank("Verification code").into()));
        }

        let response = self.inner.service.verify_otp(email.trim(), otp.trim()).await;
        let auth = match response.into_result() {
            Ok(auth) => auth,
            Err(StorefrontError::Api { status, message }) if message == GENERIC_API_ERROR => {
                return Err(self.fail(StorefrontError::Api {
                    status,
                    message: "Invalid verification code".to_string(),
                }));
            }
            Err(e) => return Err(self.fail(e)),
        };

        if let Err(e) = self
            .inner
            .tokens
            .save(&auth, chrono::Utc::now().timestamp())
        {
            return Err(self.fail(e.into()));
        }

        let user = auth.user;
        error::set_sentry_user(&user.id, Some(user.email.as_str()));
        error::add_breadcrumb("auth", "Logged in", None);
        self.inner
            .state
            .send_replace(AuthState::signed_in(user.clone()));
        self.inner.toaster.success("Successfully logged in");
        Ok(user)
    }

    /// Create an account, then send the first passcode.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank names or a malformed email, or the
    /// API error from either call.
    #[instrument(skip(self))]
    pub async fn register(&self, first_name: &str, last_name: &str, email: &str) -> Result<()> {
        let payload = match registration(first_name, last_name, email) {
            Ok(payload) => payload,
            Err(e) => return Err(self.fail(e.into())),
        };

        if let Err(e) = self.inner.service.register(&payload).await.into_result() {
            return Err(self.fail(e));
        }

        self.inner.toaster.success("Account created successfully");
        self.request_otp(payload.email.as_str()).await
    }

    /// End the session. Server-side sign-out is best effort; local state is
    /// always cleared.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if self.inner.tokens.is_authenticated()
            && let Err(e) = self.inner.service.sign_out().await.into_result()
        {
            tracing::warn!(error = %e, "Sign-out request failed");
        }

        self.clear_tokens();
        error::clear_sentry_user();
        error::add_breadcrumb("auth", "Logged out", None);
        self.inner.state.send_replace(AuthState::signed_out());
        self.inner.toaster.success("Successfully logged out");
    }

    /// Exchange the stored refresh token for a new token pair.
    ///
    /// Only ever called explicitly.
    ///
    /// # Errors
    ///
    /// Returns `SessionExpired` (and clears the tokens) when there is no usable
    /// refresh token, or the API error when the backend rejects it.
    #[instrument(skip(self))]
    pub async fn refresh_session(&self) -> Result<User> {
        let now = chrono::Utc::now().timestamp();
        let tokens = &self.inner.tokens;

        let refresh_token = tokens
            .refresh_token()
            .filter(|_| tokens.refresh_token_expires_at().is_some_and(|at| now < at));
        let Some(refresh_token) = refresh_token else {
            self.clear_tokens();
            self.inner.state.send_replace(AuthState::signed_out());
            return Err(self.fail(ValidationError::SessionExpired.into()));
        };

        let auth = self
            .inner
            .service
            .refresh(refresh_token.expose_secret())
            .await
            .into_result();
        let auth = match auth {
            Ok(auth) => auth,
            Err(e) => {
                if e.is_unauthorized() {
                    self.clear_tokens();
                    self.inner.state.send_replace(AuthState::signed_out());
                }
                return Err(self.fail(e));
            }
        };

        if let Err(e) = tokens.save(&auth, now) {
            return Err(self.fail(e.into()));
        }
        self.inner
            .state
            .send_replace(AuthState::signed_in(auth.user.clone()));
        self.inner.toaster.success("Session refreshed");
        Ok(auth.user)
    }

    fn clear_tokens(&self) {
        if let Err(e) = self.inner.tokens.clear() {
            StorefrontError::from(e).report();
        }
    }

    fn fail(&self, error: StorefrontError) -> StorefrontError {
        self.inner.toaster.failure(&error);
        error
    }
}

fn registration(
    first_name: &str,
    last_name: &str,
    email: &str,
) -> std::result::Result<UserCreate, ValidationError> {
    let first_name = first_name.trim();
    let last_name = last_name.trim();
    if first_name.is_empty() {
        return Err(ValidationError::Blank("First name"));
    }
    if last_name.is_empty() {
        return Err(ValidationError::Blank("Last name"));
    }

    Ok(UserCreate {
        email: Email::parse(email)?,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::broadcast;
    use url::Url;

    use super::*;
    use crate::api::ApiClient;
    use crate::models::test_support::sample_auth_response;
    use crate::notify::{Toast, ToastKind};
    use crate::storage::{KeyValueStore, MemoryStore};

    /// A context whose backend is unreachable; tests only exercise paths
    /// that never leave the process.
    fn offline() -> (Arc<MemoryStore>, AuthContext, broadcast::Receiver<Toast>) {
        let memory = Arc::new(MemoryStore::new());
        let tokens = TokenStore::new(memory.clone());
        let client = ApiClient::new(&Url::parse("http://127.0.0.1:9").unwrap(), tokens.clone());
        let toaster = Toaster::new();
        let toasts = toaster.subscribe();
        let context = AuthContext::new(AuthService::new(client), tokens, toaster);
        (memory, context, toasts)
    }

    fn in_an_hour() -> i64 {
        chrono::Utc::now().timestamp() + 3_600
    }

    #[test]
    fn test_starts_loading() {
        let (_, context, _) = offline();
        assert!(context.state().is_loading);
        assert!(!context.state().is_authenticated);
    }

    #[tokio::test]
    async fn test_initialize_without_tokens_is_signed_out() {
        let (_, context, _) = offline();
        context.initialize().await;
        assert_eq!(context.state(), AuthState::signed_out());
    }

    #[tokio::test]
    async fn test_initialize_trusts_cached_user() {
        let (memory, context, _) = offline();
        TokenStore::new(memory.clone())
            .save(&sample_auth_response(in_an_hour()), chrono::Utc::now().timestamp())
            .unwrap();

        context.initialize().await;
        let state = context.state();
        assert!(state.is_authenticated);
        assert!(!state.is_loading);
        assert_eq!(state.user.unwrap().first_name, "Ada");
    }

    #[tokio::test]
    async fn test_initialize_with_expired_token_is_signed_out() {
        let (memory, context, _) = offline();
        TokenStore::new(memory.clone())
            .save(&sample_auth_response(1_000), 0)
            .unwrap();

        context.initialize().await;
        assert!(!context.state().is_authenticated);
        assert!(!context.is_authenticated());
    }

    #[tokio::test]
    async fn test_request_otp_rejects_bad_email_locally() {
        let (_, context, mut toasts) = offline();
        let err = context.request_otp("not-an-email").await.unwrap_err();

        assert!(matches!(
            err,
            StorefrontError::Validation(ValidationError::InvalidEmail(_))
        ));
        assert_eq!(toasts.recv().await.unwrap().kind, ToastKind::Error);
    }

    #[tokio::test]
    async fn test_register_requires_names() {
        let (_, context, _) = offline();
        let err = context
            .register(" ", "Shopper", "user@example.com")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "First name cannot be empty");
    }

    #[tokio::test]
    async fn test_logout_when_signed_out_skips_the_network() {
        let (memory, context, mut toasts) = offline();
        memory.set("user", "{}").unwrap();

        context.logout().await;

        assert_eq!(memory.get("user").unwrap(), None);
        let toast = toasts.recv().await.unwrap();
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(toast.message, "Successfully logged out");
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token_expires_session() {
        let (_, context, _) = offline();
        let err = context.refresh_session().await.unwrap_err();
        assert!(matches!(
            err,
            StorefrontError::Validation(ValidationError::SessionExpired)
        ));
        assert!(!context.state().is_authenticated);
    }
}
