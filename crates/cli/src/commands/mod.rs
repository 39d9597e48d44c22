//! Console commands.
//!
//! Each command renders its result to a `String`; the caller decides where
//! it goes (stdout for one-shot commands, the prompt for the shell).

use std::collections::HashMap;

use clap::Subcommand;
use thiserror::Error;
use tracing::info;

use senji_admin::api::ApiError;
use senji_admin::config::{ConfigError, ConsoleConfig, LoginCredentials};
use senji_admin::forms::FormError;
use senji_admin::services::{AuthError, AuthService, StatusControl};
use senji_admin::views::{DEFAULT_PAGE_SIZE, OrderBoard};
use senji_admin::{ApiClient, ConsoleError, CredentialStore};
use senji_core::{OrderId, OrderPage};

pub mod account;
pub mod categories;
pub mod orders;
pub mod products;
pub mod shell;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{}", .0.user_message())]
    Console(#[from] ConsoleError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A flag value could not be understood.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CliError {
    /// Whether the session must be re-established before continuing.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Console(e) if e.requires_login())
    }
}

impl From<ApiError> for CliError {
    fn from(e: ApiError) -> Self {
        Self::Console(e.into())
    }
}

impl From<AuthError> for CliError {
    fn from(e: AuthError) -> Self {
        Self::Console(e.into())
    }
}

impl From<FormError> for CliError {
    fn from(e: FormError) -> Self {
        Self::Console(e.into())
    }
}

/// Commands available both on the command line and inside the shell.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the signed-in admin
    Me,
    /// Show store totals and recent orders
    Dashboard,
    /// List customers
    Customers,
    /// Manage products
    Products {
        #[command(subcommand)]
        action: products::ProductAction,
    },
    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: categories::CategoryAction,
    },
    /// Browse orders and change their status
    Orders {
        #[command(subcommand)]
        action: orders::OrderAction,
    },
}

/// A signed-in console session.
///
/// Holds the order board and one status control per order touched, so
/// repeated commands in a shell share the same single-flight state.
pub struct Console {
    api: ApiClient,
    auth: AuthService,
    board: OrderBoard,
    controls: HashMap<OrderId, StatusControl>,
}

impl Console {
    /// Build the API client and sign in.
    ///
    /// # Errors
    ///
    /// Returns error if the client cannot be built or the login fails.
    pub async fn connect(
        config: &ConsoleConfig,
        credentials: &LoginCredentials,
    ) -> Result<Self, CliError> {
        let api = ApiClient::new(&config.api, CredentialStore::new())?;
        let auth = AuthService::new(api.clone());
        let admin = auth.login(&credentials.email, &credentials.password).await?;
        info!(email = %admin.email, "Signed in");

        Ok(Self {
            api,
            auth,
            board: empty_board(),
            controls: HashMap::new(),
        })
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Run one command and render its output.
    ///
    /// # Errors
    ///
    /// Returns the command's failure; `requires_login()` tells whether the
    /// session was lost.
    pub async fn execute(&mut self, command: Command) -> Result<String, CliError> {
        match command {
            Command::Me => account::me(&self.auth).await,
            Command::Dashboard => account::dashboard(&self.api).await,
            Command::Customers => account::customers(&self.api).await,
            Command::Products { action } => products::run(&self.api, action).await,
            Command::Categories { action } => categories::run(&self.api, action).await,
            Command::Orders { action } => orders::run(self, action).await,
        }
    }

    /// Sign out, ignoring backend failures.
    pub async fn close(&self) {
        self.auth.logout().await;
    }

    /// Drop the session after the backend rejected it.
    pub fn expire(&self) {
        self.auth.expire_session();
    }

    /// The status control for an order, created from `order` on first use.
    fn control_for(&mut self, order: senji_core::Order) -> StatusControl {
        self.controls
            .entry(order.id.clone())
            .or_insert_with(|| StatusControl::new(order))
            .clone()
    }
}

fn empty_board() -> OrderBoard {
    OrderBoard::new(
        OrderPage {
            orders: vec![],
            pagination: None,
        },
        1,
        DEFAULT_PAGE_SIZE,
    )
}

/// Parse `true/false/yes/no/1/0`.
pub(crate) fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => Err(format!("expected true or false, got '{other}'")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("Yes").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_requires_login_only_for_auth_failures() {
        let expired = CliError::from(AuthError::SessionExpired);
        assert!(expired.requires_login());

        let missing = CliError::from(FormError::MissingName);
        assert!(!missing.requires_login());
        assert_eq!(missing.to_string(), FormError::MissingName.to_string());
    }
}
