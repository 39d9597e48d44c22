//! Console services.
//!
//! # Services
//!
//! - `auth` - Admin sign-in, sign-out and session queries
//! - `change_detector` - Decides whether a product edit changes anything
//! - `status_updater` - Optimistic, single-flight order status changes

pub mod auth;
pub mod change_detector;
pub mod status_updater;

pub use auth::{AuthError, AuthService};
pub use change_detector::{DraftError, ProductDraft, has_changes};
pub use status_updater::{
    OrderStatusGateway, StatusChangeRejected, StatusControl, StatusOutcome, StatusRequest,
    StatusUpdater,
};

/// Where the console must go next after a session-level event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Back to the login screen; all credentials have been cleared.
    Login,
}
