//! Admin authentication endpoints.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use senji_core::AdminProfile;

use super::{ApiClient, ApiError, wire};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Raw result of a login call.
///
/// Either part may be missing from a malformed response; the auth service
/// decides what that means.
pub struct LoginReply {
    pub token: Option<SecretString>,
    pub admin: Option<AdminProfile>,
}

impl std::fmt::Debug for LoginReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginReply")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("admin", &self.admin)
            .finish()
    }
}

impl ApiClient {
    /// Exchange admin credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for rejected credentials, or another
    /// error if the request fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginReply, ApiError> {
        let request = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        let value: Value = self
            .send_json(Method::POST, "/admin/login", &request)
            .await?;

        let token = ["token", "access_token"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_str))
            .filter(|token| !token.is_empty())
            .map(SecretString::from);
        let admin = ["admin", "user"]
            .iter()
            .find_map(|key| value.get(key).filter(|v| v.is_object()))
            .map(wire::admin_profile);

        Ok(LoginReply { token, admin })
    }

    /// Invalidate the current token on the backend.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.send_empty(Method::POST, "/admin/logout").await
    }

    /// Fetch the signed-in admin's profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the token is no longer valid, or
    /// `ApiError::Decode` if the response carries no profile.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<AdminProfile, ApiError> {
        let value: Value = self.get("/admin/me", &[]).await?;
        wire::single(value, "admin")
            .filter(Value::is_object)
            .map(|profile| wire::admin_profile(&profile))
            .ok_or_else(|| ApiError::Decode("profile response carried no admin".to_string()))
    }
}
