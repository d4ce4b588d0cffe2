//! Route protection for account pages.
//!
//! Requests to protected paths without an `access_token` cookie are sent to
//! the login page with a `callbackUrl`; requests to the login page that do
//! carry one are sent to the profile. The cookie is only checked for presence:
//! expiry is enforced by the API, not here.

use axum::{
    extract::Request,
    http::{HeaderMap, header::COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::storage::tokens::ACCESS_TOKEN_COOKIE_NAME;

/// Paths that require a token. Sub-paths are protected too.
pub const PROTECTED_ROUTES: [&str; 4] = ["/profile", "/acquisitions", "/sessions", "/hub"];

/// The login page.
pub const LOGIN_PATH: &str = "/login";

/// Where authenticated visitors of the login page are sent.
pub const PROFILE_PATH: &str = "/profile";

/// Outcome of the gate for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Let the request through.
    Allow,
    /// Send the visitor to log in, then back to `callback`.
    RedirectToLogin { callback: String },
    /// Already logged in; skip the login page.
    RedirectToProfile,
}

impl RouteDecision {
    /// Redirect target, if any.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin { callback } => Some(format!(
                "{LOGIN_PATH}?callbackUrl={}",
                urlencoding::encode(callback)
            )),
            Self::RedirectToProfile => Some(PROFILE_PATH.to_string()),
        }
    }
}

/// Whether `path` is, or is under, a protected route.
#[must_use]
pub fn is_protected(path: &str) -> bool {
    PROTECTED_ROUTES.iter().any(|route| {
        path.strip_prefix(route)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Decide what to do with a request for `path`. An empty token counts as none.
#[must_use]
pub fn evaluate(path: &str, token: Option<&str>) -> RouteDecision {
    let has_token = token.is_some_and(|t| !t.is_empty());

    if path == LOGIN_PATH && has_token {
        return RouteDecision::RedirectToProfile;
    }

    if is_protected(path) && !has_token {
        return RouteDecision::RedirectToLogin {
            callback: path.to_string(),
        };
    }

    RouteDecision::Allow
}

/// The `access_token` cookie value from request headers.
#[must_use]
pub fn access_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == ACCESS_TOKEN_COOKIE_NAME)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// The token carried by a stored `Set-Cookie` record, unless it is expired.
#[must_use]
pub fn access_token_from_set_cookie(record: &str) -> Option<String> {
    let mut parts = record.split(';').map(str::trim);
    let (name, value) = parts.next()?.split_once('=')?;
    if name != ACCESS_TOKEN_COOKIE_NAME || value.is_empty() {
        return None;
    }

    let expired = parts
        .filter_map(|attr| attr.split_once('='))
        .find(|(key, _)| key.eq_ignore_ascii_case("Max-Age"))
        .and_then(|(_, max_age)| max_age.parse::<i64>().ok())
        .is_some_and(|max_age| max_age <= 0);

    (!expired).then(|| value.to_string())
}

/// Middleware applying [`evaluate`] with a 307 redirect.
pub async fn route_guard(request: Request, next: Next) -> Response {
    let token = access_token_from_headers(request.headers());
    let decision = evaluate(request.uri().path(), token.as_deref());

    match decision.location() {
        Some(location) => {
            tracing::debug!(path = %request.uri().path(), %location, "Route gate redirect");
            Redirect::temporary(&location).into_response()
        }
        None => next.run(request).await,
    }
}
