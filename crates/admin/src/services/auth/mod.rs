//! Admin authentication service.
//!
//! Signs admins in and out against the backend and keeps the session's
//! [`CredentialStore`](crate::session::CredentialStore) in step. The store
//! is shared with the API client, so a successful login authenticates every
//! later request.

mod error;

pub use error::AuthError;

use secrecy::SecretString;
use tracing::{info, instrument, warn};

use senji_core::AdminProfile;

use super::Navigation;
use crate::api::{ApiClient, ApiError};
use crate::session::Session;

/// Admin authentication service.
#[derive(Debug, Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    /// Create a service writing to the API client's credential store.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    /// Sign in and store the token and profile.
    ///
    /// # Errors
    ///
    /// - `AuthError::MissingCredentials` if either field is blank
    /// - `AuthError::InvalidCredentials` if the backend rejects them
    /// - `AuthError::InvalidResponse` if the response lacks a token or profile
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AdminProfile, AuthError> {
        use secrecy::ExposeSecret;

        let email = email.trim();
        if email.is_empty() || password.expose_secret().is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let reply = match self.api.login(email, password).await {
            Ok(reply) => reply,
            Err(ApiError::Unauthorized(message)) => {
                return Err(AuthError::InvalidCredentials(message));
            }
            Err(e) => return Err(e.into()),
        };

        let (Some(token), Some(admin)) = (reply.token, reply.admin) else {
            return Err(AuthError::InvalidResponse);
        };

        self.api.credentials().store(Session {
            token,
            admin: admin.clone(),
        });
        info!(admin = %admin.email, "Admin signed in");
        Ok(admin)
    }

    /// Sign out.
    ///
    /// Backend failures are logged and otherwise ignored; local credentials
    /// are always cleared.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Navigation {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Logout request failed");
        }
        self.api.credentials().clear();
        info!("Admin signed out");
        Navigation::Login
    }

    /// Drop all credentials after the backend rejected the session.
    pub fn expire_session(&self) -> Navigation {
        warn!("Session rejected by backend, clearing credentials");
        self.api.credentials().clear();
        Navigation::Login
    }

    // =========================================================================
    // Session queries
    // =========================================================================

    /// Whether a token is stored. Does not contact the backend.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.api.credentials().is_authenticated()
    }

    /// Profile of the signed-in admin.
    #[must_use]
    pub fn current_admin(&self) -> Option<AdminProfile> {
        self.api.credentials().admin()
    }

    /// Whether the signed-in admin has the `admin` role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current_admin()
            .is_some_and(|admin| admin.is_admin())
    }

    /// Reload the signed-in admin's profile from the backend.
    ///
    /// # Errors
    ///
    /// - `AuthError::NotAuthenticated` if no session is stored
    /// - `AuthError::SessionExpired` if the token was rejected (credentials
    ///   are cleared)
    #[instrument(skip(self))]
    pub async fn refresh_profile(&self) -> Result<AdminProfile, AuthError> {
        if !self.is_logged_in() {
            return Err(AuthError::NotAuthenticated);
        }
        match self.api.me().await {
            Ok(admin) => {
                self.api.credentials().update_admin(admin.clone());
                Ok(admin)
            }
            Err(e) if e.is_unauthorized() => {
                self.expire_session();
                Err(AuthError::SessionExpired)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::session::CredentialStore;

    fn service(store: CredentialStore) -> AuthService {
        let api = ApiClient::new(&ApiConfig::new("http://127.0.0.1:9/api").unwrap(), store).unwrap();
        AuthService::new(api)
    }

    fn session(role: &str) -> Session {
        Session {
            token: SecretString::from("tok"),
            admin: AdminProfile {
                id: None,
                name: "Kim".to_string(),
                email: "kim@senji.shop".to_string(),
                role: Some(role.into()),
            },
        }
    }

    #[tokio::test]
    async fn test_login_rejects_blank_fields() {
        let auth = service(CredentialStore::new());
        let result = auth.login("  ", &SecretString::from("pw")).await;
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
        let result = auth.login("kim@senji.shop", &SecretString::from("")).await;
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_session_queries() {
        let auth = service(CredentialStore::with_session(session("admin")));
        assert!(auth.is_logged_in());
        assert!(auth.is_admin());
        assert_eq!(auth.current_admin().unwrap().name, "Kim");

        let staff = service(CredentialStore::with_session(session("editor")));
        assert!(!staff.is_admin());
    }

    #[test]
    fn test_expire_session_clears_store() {
        let store = CredentialStore::with_session(session("admin"));
        let auth = service(store.clone());
        assert_eq!(auth.expire_session(), Navigation::Login);
        assert!(!store.is_authenticated());
        assert!(!auth.is_logged_in());
    }

    #[tokio::test]
    async fn test_refresh_requires_session() {
        let auth = service(CredentialStore::new());
        assert!(matches!(
            auth.refresh_profile().await,
            Err(AuthError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_backend_unreachable() {
        let store = CredentialStore::with_session(session("admin"));
        let auth = service(store.clone());
        assert_eq!(auth.logout().await, Navigation::Login);
        assert!(!store.is_authenticated());
    }
}
