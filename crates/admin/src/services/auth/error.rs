//! Admin authentication error types.

use thiserror::Error;

use crate::api::ApiError;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Email or password left blank.
    #[error("Please enter your email and password")]
    MissingCredentials,

    /// The backend rejected the email/password pair.
    #[error("Invalid email or password: {0}")]
    InvalidCredentials(String),

    /// Login succeeded but the response lacked a token or profile.
    #[error("Invalid login response from server")]
    InvalidResponse,

    /// No session is stored.
    #[error("Not logged in")]
    NotAuthenticated,

    /// The stored token was rejected; credentials have been cleared.
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// Any other backend failure.
    #[error(transparent)]
    Api(#[from] ApiError),
}
