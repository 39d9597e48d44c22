//! Unified error handling for the console.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::forms::FormError;
use crate::services::{AuthError, DraftError, StatusChangeRejected};

/// Console-level error type.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Client-side form validation failed.
    #[error(transparent)]
    Form(#[from] FormError),

    /// Submitted multipart fields could not be read back.
    #[error("Invalid submission: {0}")]
    Draft(#[from] DraftError),

    /// Backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Sign-in or session failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A status change was already in progress.
    #[error(transparent)]
    Status(#[from] StatusChangeRejected),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A payload could not be encoded.
    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Error categories the console reacts to differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required field is missing or malformed; caught before any request.
    Validation,
    /// The backend could not be reached or timed out.
    Network,
    /// The session is missing or was rejected; a new login is required.
    Authentication,
    /// The backend rejected submitted fields (HTTP 422).
    ServerValidation,
    /// The requested record does not exist.
    NotFound,
    /// Anything else.
    Other,
}

const fn api_kind(error: &ApiError) -> ErrorKind {
    match error {
        ApiError::Timeout | ApiError::Network(_) => ErrorKind::Network,
        ApiError::Unauthorized(_) => ErrorKind::Authentication,
        ApiError::Validation { .. } => ErrorKind::ServerValidation,
        ApiError::NotFound(_) => ErrorKind::NotFound,
        ApiError::Api { .. } | ApiError::Decode(_) | ApiError::InvalidRequest(_) => {
            ErrorKind::Other
        }
    }
}

impl ConsoleError {
    /// Category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Form(_) | Self::Draft(_) | Self::Status(_) => ErrorKind::Validation,
            Self::Api(e) | Self::Auth(AuthError::Api(e)) => api_kind(e),
            Self::Auth(AuthError::MissingCredentials) => ErrorKind::Validation,
            Self::Auth(
                AuthError::InvalidCredentials(_)
                | AuthError::NotAuthenticated
                | AuthError::SessionExpired,
            ) => ErrorKind::Authentication,
            Self::Auth(AuthError::InvalidResponse) | Self::Config(_) | Self::Encode(_) => {
                ErrorKind::Other
            }
        }
    }

    /// Whether the session must be re-established.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self.kind(), ErrorKind::Authentication)
    }

    /// Message suitable for showing to an admin.
    ///
    /// Client-side validation messages are shown as-is, server field errors
    /// one field per line, and everything else as a generic message for
    /// its category.
    #[must_use]
    pub fn user_message(&self) -> String {
        match (self.kind(), self) {
            (ErrorKind::Validation, _) => self.to_string(),
            (ErrorKind::ServerValidation, Self::Api(e) | Self::Auth(AuthError::Api(e))) => e
                .field_errors()
                .unwrap_or_else(|| match e {
                    ApiError::Validation { message, .. } => message.clone(),
                    other => other.to_string(),
                }),
            (ErrorKind::Network, _) => {
                "Unable to reach the server. Please check your connection and try again."
                    .to_string()
            }
            (ErrorKind::Authentication, Self::Auth(AuthError::InvalidCredentials(_))) => {
                "Invalid email or password".to_string()
            }
            (ErrorKind::Authentication, _) => {
                "Your session has expired. Please log in again.".to_string()
            }
            (ErrorKind::NotFound, _) => "The requested item could not be found.".to_string(),
            (_, Self::Api(ApiError::Api { message, .. })) => message.clone(),
            (_, Self::Auth(AuthError::InvalidResponse)) => self.to_string(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_kinds() {
        assert_eq!(
            ConsoleError::from(FormError::MissingName).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            ConsoleError::from(ApiError::Timeout).kind(),
            ErrorKind::Network
        );
        assert_eq!(
            ConsoleError::from(AuthError::Api(ApiError::NotFound("x".to_string()))).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ConsoleError::from(AuthError::SessionExpired).kind(),
            ErrorKind::Authentication
        );
    }

    #[test]
    fn test_requires_login_only_for_authentication() {
        assert!(ConsoleError::from(ApiError::Unauthorized("expired".to_string())).requires_login());
        assert!(
            !ConsoleError::from(ApiError::Api {
                status: 500,
                message: "boom".to_string()
            })
            .requires_login()
        );
        assert!(!ConsoleError::from(FormError::InvalidPrice).requires_login());
    }

    #[test]
    fn test_user_message_for_form_error_is_verbatim() {
        let err = ConsoleError::from(FormError::MissingVariants);
        assert_eq!(
            err.user_message(),
            "Please add at least one size variant for this category"
        );
    }

    #[test]
    fn test_user_message_lists_field_errors() {
        let mut errors = BTreeMap::new();
        errors.insert("price".to_string(), vec!["must be at least 0.01".to_string()]);
        let err = ConsoleError::from(ApiError::Validation {
            message: "The given data was invalid.".to_string(),
            errors,
        });
        assert_eq!(err.kind(), ErrorKind::ServerValidation);
        assert_eq!(err.user_message(), "price: must be at least 0.01");
    }

    #[test]
    fn test_user_message_fallbacks() {
        let err = ConsoleError::from(ApiError::Api {
            status: 500,
            message: "Server Error".to_string(),
        });
        assert_eq!(err.user_message(), "Server Error");

        let err = ConsoleError::from(ApiError::Decode("bad".to_string()));
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
    }
}
