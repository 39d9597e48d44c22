//! REST client for the Senji store backend.
//!
//! # Architecture
//!
//! - One `reqwest::Client` per console session, configured with the base URL
//!   and request timeout from [`ApiConfig`]
//! - Bearer token read from the session's [`CredentialStore`] on every request;
//!   requests go out unauthenticated when no token is stored
//! - Backend payload quirks are absorbed by the [`wire`] adapter; endpoint
//!   methods only ever return `senji_core` types
//!
//! # Endpoints
//!
//! | area | methods |
//! |---|---|
//! | auth | `POST /admin/login`, `POST /admin/logout`, `GET /admin/me` |
//! | products | `GET/POST/PUT/DELETE /products[/:id]` |
//! | categories | `GET/POST/DELETE /categories[/:id]` (update is `POST /categories/:id`) |
//! | orders | `GET /orders`, `GET /orders/:id`, `PUT /orders/:id/status` |
//! | dashboard | `GET /dashboard/stats`, `GET /dashboard/recent-orders` |
//! | customers | `GET /admin/users` |

pub mod auth;
pub mod categories;
pub mod customers;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod wire;

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;
use crate::session::CredentialStore;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Connection or transport failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend rejected the credentials (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend rejected the submitted fields (HTTP 422 or an `errors` body).
    #[error("Validation failed: {message}")]
    Validation {
        /// Summary message from the backend.
        message: String,
        /// Per-field messages, verbatim.
        errors: BTreeMap<String, Vec<String>>,
    },

    /// Any other non-success response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Backend message, or the status reason when the body had none.
        message: String,
    },

    /// A response body could not be mapped onto the console's types.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// A request could not be built (bad path or payload).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Whether this is an authentication rejection.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Whether the request never got a response.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Timeout | Self::Network(_))
    }

    /// Per-field messages rendered one field per line (`field: a, b`).
    ///
    /// Returns `None` unless this is a validation failure carrying field
    /// errors.
    #[must_use]
    pub fn field_errors(&self) -> Option<String> {
        match self {
            Self::Validation { errors, .. } if !errors.is_empty() => Some(
                errors
                    .iter()
                    .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else if error.is_builder() {
            Self::InvalidRequest(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

/// Error body shape shared by the backend's failure responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Option<BTreeMap<String, FieldMessages>>,
}

/// Field errors arrive either as a list or as a single string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldMessages {
    Many(Vec<String>),
    One(String),
}

impl FieldMessages {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::Many(messages) => messages,
            Self::One(message) => vec![message],
        }
    }
}

/// Senji backend API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the credential
/// store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    credentials: CredentialStore,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("credentials", &self.inner.credentials)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new client bound to a credential store.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig, credentials: CredentialStore) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("senji-console/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                credentials,
            }),
        })
    }

    /// The credential store read by this client.
    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an endpoint path against the base URL.
    ///
    /// The base URL's own path is kept: `/orders` on
    /// `https://host/api/v1/senji` becomes `https://host/api/v1/senji/orders`.
    pub(crate) fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                ApiError::InvalidRequest(format!(
                    "base URL cannot take a path: {}",
                    self.inner.base_url
                ))
            })?;
            segments.pop_if_empty();
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
        }
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Start a request, attaching the bearer token when one is stored.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.inner.client.request(method, url);
        match self.inner.credentials.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Execute a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, query)?;
        self.send(self.request(Method::GET, url)).await
    }

    /// Execute a request with a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, &[])?;
        self.send(self.request(method, url).json(body)).await
    }

    /// Execute a request with a JSON body, tolerating a success reply that
    /// is not JSON.
    ///
    /// Returns `None` for an empty or non-JSON success body. Failure
    /// statuses map onto the error taxonomy as usual.
    pub(crate) async fn send_json_lenient<B: serde::Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Option<serde_json::Value>, ApiError> {
        let url = self.endpoint(path, &[])?;
        let request = self.request(method, url).json(body).build()?;
        debug!(method = %request.method(), url = %request.url(), "Sending request");
        let response = self.inner.client.execute(request).await?;
        if !response.status().is_success() {
            return Err(Self::parse_error(response).await);
        }
        let body = response.bytes().await?;
        match serde_json::from_slice(&body) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                debug!(error = %e, "Success reply is not JSON, ignoring body");
                Ok(None)
            }
        }
    }

    /// Execute a request with a multipart body.
    pub(crate) async fn send_multipart<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, &[])?;
        self.send(self.request(method, url).multipart(form)).await
    }

    /// Execute a request without a body, discarding the response body.
    pub(crate) async fn send_empty(&self, method: Method, path: &str) -> Result<(), ApiError> {
        let url = self.endpoint(path, &[])?;
        let _: serde_json::Value = self.send(self.request(method, url)).await?;
        Ok(())
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let request = builder.build()?;
        debug!(method = %request.method(), url = %request.url(), "Sending request");
        let response = self.inner.client.execute(request).await?;
        Self::handle_response(response).await
    }

    /// Handle API response and parse JSON.
    ///
    /// An empty success body decodes as JSON `null`.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            if body.iter().all(u8::is_ascii_whitespace) {
                return Ok(serde_json::from_str("null")?);
            }
            return Ok(serde_json::from_slice(&body)?);
        }

        Err(Self::parse_error(response).await)
    }

    /// Map a failure response onto the error taxonomy.
    async fn parse_error(response: reqwest::Response) -> ApiError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let message = body
            .message
            .or(body.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        debug!(status = status.as_u16(), %message, "Request failed");

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            _ if status == StatusCode::UNPROCESSABLE_ENTITY || body.errors.is_some() => {
                ApiError::Validation {
                    message,
                    errors: body
                        .errors
                        .unwrap_or_default()
                        .into_iter()
                        .map(|(field, messages)| (field, messages.into_vec()))
                        .collect(),
                }
            }
            _ => ApiError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}
