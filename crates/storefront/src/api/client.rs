//! Thin JSON client for the Baiyit backend.
//!
//! Every call resolves to an [`ApiResponse`]: HTTP-level failures become an
//! error string plus the status, network-level failures become status `0`.
//! Nothing is retried and no timeout is applied.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use crate::error::StorefrontError;
use crate::storage::TokenStore;

/// Message used when a failed response carries no usable detail.
pub const GENERIC_API_ERROR: &str = "An error occurred";

// =============================================================================
// Request / Response
// =============================================================================

/// Per-request options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method, `GET` by default.
    pub method: Method,
    /// Extra headers, applied after `Content-Type` and able to override it.
    pub headers: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<serde_json::Value>,
    /// Attach the stored bearer token, if any.
    pub requires_auth: bool,
}

impl RequestOptions {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub const fn authenticated(mut self, requires_auth: bool) -> Self {
        self.requires_auth = requires_auth;
        self
    }
}

/// Uniform result of an API call.
///
/// Exactly one of `data` and `error` is set. `status` is the HTTP status, or
/// `0` when no response was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub status: u16,
}

impl<T> ApiResponse<T> {
    const fn success(data: T, status: u16) -> Self {
        Self {
            data: Some(data),
            error: None,
            status,
        }
    }

    fn failure(error: impl Into<String>, status: u16) -> Self {
        Self {
            data: None,
            error: Some(error.into()),
            status,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.data.is_some()
    }

    /// Convert into a `Result`, classifying the failure.
    ///
    /// # Errors
    ///
    /// `Transport` for status `0`, `Api` for everything else.
    pub fn into_result(self) -> Result<T, StorefrontError> {
        match (self.data, self.error) {
            (Some(data), _) => Ok(data),
            (None, error) => {
                let message = error.unwrap_or_else(|| GENERIC_API_ERROR.to_string());
                if self.status == 0 {
                    Err(StorefrontError::Transport(message))
                } else {
                    Err(StorefrontError::Api {
                        status: self.status,
                        message,
                    })
                }
            }
        }
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// HTTP client bound to a base URL and the token store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    tokens: TokenStore,
}

impl ApiClient {
    /// Create a client for `base_url`, reading bearer tokens from `tokens`.
    #[must_use]
    pub fn new(base_url: &Url, tokens: TokenStore) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.as_str().trim_end_matches('/').to_string(),
                tokens,
            }),
        }
    }

    /// The token store requests authenticate from.
    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    /// Issue a request and normalize the outcome.
    #[instrument(skip(self, options), fields(method = %options.method))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResponse<T> {
        let url = format!("{}{endpoint}", self.inner.base_url);

        let headers = match self.build_headers(&options) {
            Ok(headers) => headers,
            Err(message) => {
                tracing::error!(%url, error = %message, "Invalid request header");
                return ApiResponse::failure(message, 0);
            }
        };

        let mut builder = self
            .inner
            .client
            .request(options.method, &url)
            .headers(headers);
        if let Some(body) = &options.body {
            builder = builder.body(body.to_string());
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(%url, error = %e, "API request failed");
                return ApiResponse::failure(e.to_string(), 0);
            }
        };

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("application/json"));

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(%url, error = %e, "Failed to read API response body");
                return ApiResponse::failure(e.to_string(), 0);
            }
        };

        let body = if is_json {
            serde_json::from_str::<serde_json::Value>(&text).ok()
        } else {
            Some(serde_json::Value::String(text))
        };

        if !status.is_success() {
            let message = body
                .as_ref()
                .filter(|_| is_json)
                .and_then(error_message)
                .unwrap_or_else(|| GENERIC_API_ERROR.to_string());
            tracing::debug!(%url, status = status.as_u16(), error = %message, "API returned error");
            return ApiResponse::failure(message, status.as_u16());
        }

        let Some(body) = body else {
            tracing::warn!(%url, "API returned malformed JSON");
            return ApiResponse::failure("Invalid JSON in response", status.as_u16());
        };

        match serde_json::from_value::<T>(body) {
            Ok(data) => ApiResponse::success(data, status.as_u16()),
            Err(e) => {
                tracing::warn!(%url, error = %e, "Unexpected API response shape");
                ApiResponse::failure(format!("Unexpected response: {e}"), status.as_u16())
            }
        }
    }

    /// `GET endpoint`.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str, requires_auth: bool) -> ApiResponse<T> {
        self.request(endpoint, RequestOptions::new(Method::GET).authenticated(requires_auth))
            .await
    }

    /// `POST endpoint` with a JSON body.
    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
        requires_auth: bool,
    ) -> ApiResponse<T> {
        self.send_json(Method::POST, endpoint, body, requires_auth).await
    }

    /// `PUT endpoint` with a JSON body.
    pub async fn put<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
        requires_auth: bool,
    ) -> ApiResponse<T> {
        self.send_json(Method::PUT, endpoint, body, requires_auth).await
    }

    /// `PATCH endpoint` with a JSON body.
    pub async fn patch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &impl Serialize,
        requires_auth: bool,
    ) -> ApiResponse<T> {
        self.send_json(Method::PATCH, endpoint, body, requires_auth).await
    }

    /// `DELETE endpoint`.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        requires_auth: bool,
    ) -> ApiResponse<T> {
        self.request(
            endpoint,
            RequestOptions::new(Method::DELETE).authenticated(requires_auth),
        )
        .await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: &impl Serialize,
        requires_auth: bool,
    ) -> ApiResponse<T> {
        let body = match serde_json::to_value(body) {
            Ok(body) => body,
            Err(e) => return ApiResponse::failure(e.to_string(), 0),
        };
        self.request(
            endpoint,
            RequestOptions::new(method)
                .body(body)
                .authenticated(requires_auth),
        )
        .await
    }

    fn build_headers(&self, options: &RequestOptions) -> Result<HeaderMap, String> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| format!("Invalid header name {name}: {e}"))?;
            let value =
                HeaderValue::from_str(value).map_err(|e| format!("Invalid header value: {e}"))?;
            headers.insert(name, value);
        }

        if options.requires_auth
            && let Some(token) = self.inner.tokens.access_token()
        {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| format!("Invalid access token: {e}"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }
}

/// `detail` or `message` from an error body, when it is a string.
fn error_message(body: &serde_json::Value) -> Option<String> {
    ["detail", "message"].iter().find_map(|key| {
        body.get(key)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}
