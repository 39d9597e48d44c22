//! Senji Admin library.
//!
//! Everything the store's admin console does against the Senji backend,
//! independent of how it is presented:
//!
//! - [`api`] - REST client and the adapter that normalizes backend records
//! - [`session`] - Session-scoped credential store shared with the client
//! - [`services`] - Auth, change detection and optimistic status updates
//! - [`forms`] - Product and category form state, validation and submission
//! - [`views`] - Dashboard, catalog, category and order listings
//! - [`components`] - Plain-text tables used by the CLI
//!
//! # Security
//!
//! The bearer token never leaves memory and every type holding it redacts it
//! from `Debug` output.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod components;
pub mod config;
pub mod error;
pub mod forms;
pub mod services;
pub mod session;
pub mod views;

pub use api::{ApiClient, ApiError};
pub use config::{ApiConfig, ConfigError, ConsoleConfig, LoginCredentials};
pub use error::{ConsoleError, ErrorKind};
pub use services::Navigation;
pub use session::{CredentialStore, Session};
