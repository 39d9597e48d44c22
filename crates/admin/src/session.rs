//! Session-scoped credential store.
//!
//! Holds the bearer token and the signed-in admin's profile for the lifetime
//! of a console session. The store is an explicit handle: the API client
//! receives a clone at construction and reads it on every request, and the
//! auth service writes it on login, logout and session expiry. Nothing is
//! written to disk.

use std::sync::{Arc, PoisonError, RwLock};

use secrecy::SecretString;
use senji_core::AdminProfile;

/// Credentials for an authenticated session.
#[derive(Clone)]
pub struct Session {
    /// Bearer token attached to every request.
    pub token: SecretString,
    /// Profile of the signed-in admin.
    pub admin: AdminProfile,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("admin", &self.admin)
            .finish()
    }
}

/// Shared handle to the current session's credentials.
///
/// Cloning the handle shares the underlying store.
#[derive(Clone, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Option<Session>>>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl CredentialStore {
    /// Create an empty (unauthenticated) store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a session.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(session))),
        }
    }

    /// Replace the stored session.
    pub fn store(&self, session: Session) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    /// Replace the stored admin profile, keeping the token.
    ///
    /// Does nothing when no session is stored.
    pub fn update_admin(&self, admin: AdminProfile) {
        if let Some(session) = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
        {
            session.admin = admin;
        }
    }

    /// Remove all stored credentials.
    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// The bearer token, if a session is stored.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.read(|session| session.token.clone())
    }

    /// The signed-in admin, if a session is stored.
    #[must_use]
    pub fn admin(&self) -> Option<AdminProfile> {
        self.read(|session| session.admin.clone())
    }

    /// Whether a token is stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read(|_| ()).is_some()
    }

    fn read<T>(&self, f: impl FnOnce(&Session) -> T) -> Option<T> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn session() -> Session {
        Session {
            token: SecretString::from("tok_123"),
            admin: AdminProfile {
                id: None,
                name: "Kim".to_string(),
                email: "kim@senji.shop".to_string(),
                role: None,
            },
        }
    }

    #[test]
    fn test_store_and_clear() {
        let store = CredentialStore::new();
        assert!(!store.is_authenticated());

        store.store(session());
        assert!(store.is_authenticated());
        assert_eq!(
            store.token().map(|t| t.expose_secret().to_string()),
            Some("tok_123".to_string())
        );

        store.clear();
        assert!(!store.is_authenticated());
        assert!(store.admin().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = CredentialStore::new();
        let reader = store.clone();
        store.store(session());
        assert!(reader.is_authenticated());
        reader.clear();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_update_admin_keeps_token() {
        let store = CredentialStore::with_session(session());
        let mut admin = session().admin;
        admin.name = "Kim Lee".to_string();
        store.update_admin(admin);
        assert_eq!(store.admin().map(|a| a.name), Some("Kim Lee".to_string()));
        assert!(store.token().is_some());
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug_output = format!("{:?}", session());
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("tok_123"));
    }
}
