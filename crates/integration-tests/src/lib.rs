//! Integration tests for the Senji admin console.
//!
//! Every test runs the console library against a `wiremock` server standing
//! in for the store backend, so no network access or credentials are
//! needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p senji-integration-tests
//! ```
//!
//! # Test Files
//!
//! - `api_client` - Request shapes, auth header, error taxonomy
//! - `auth` - Login, logout, profile refresh, session expiry
//! - `product_editor` - Product forms against the change detector
//! - `status_updater` - Optimistic status changes, rollback, single flight

use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::MockServer;

use senji_admin::{ApiClient, ApiConfig, CredentialStore, Session};
use senji_core::{AdminProfile, AdminRole};

/// Path prefix of the mocked backend, mirroring the hosted API layout.
pub const API_PREFIX: &str = "/api/v1/senji";

/// Token stored by [`TestContext::signed_in`].
pub const TEST_TOKEN: &str = "test-token";

/// A mock backend and a client pointed at it.
pub struct TestContext {
    pub server: MockServer,
    pub api: ApiClient,
}

impl TestContext {
    /// Client with no stored session.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    pub async fn new() -> Self {
        Self::with_credentials(CredentialStore::new(), Duration::from_secs(5)).await
    }

    /// Client whose store already holds [`TEST_TOKEN`].
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    pub async fn signed_in() -> Self {
        let credentials = CredentialStore::with_session(Session {
            token: SecretString::from(TEST_TOKEN),
            admin: admin(),
        });
        Self::with_credentials(credentials, Duration::from_secs(5)).await
    }

    /// Signed-in client with a custom request timeout.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    pub async fn with_timeout(timeout: Duration) -> Self {
        let ctx = Self::signed_in().await;
        let credentials = ctx.api.credentials().clone();
        Self::on_server(ctx.server, credentials, timeout)
    }

    async fn with_credentials(credentials: CredentialStore, timeout: Duration) -> Self {
        let server = MockServer::start().await;
        Self::on_server(server, credentials, timeout)
    }

    #[allow(clippy::expect_used)]
    fn on_server(server: MockServer, credentials: CredentialStore, timeout: Duration) -> Self {
        let config = ApiConfig::new(&format!("{}{API_PREFIX}", server.uri()))
            .expect("mock server URI should parse")
            .with_timeout(timeout);
        let api = ApiClient::new(&config, credentials).expect("client should build");
        Self { server, api }
    }
}

/// Full mock path for an endpoint, e.g. `path("/orders")`.
#[must_use]
pub fn path(endpoint: &str) -> String {
    format!("{API_PREFIX}{endpoint}")
}

/// The admin stored by [`TestContext::signed_in`].
#[must_use]
pub fn admin() -> AdminProfile {
    AdminProfile {
        id: None,
        name: "Kim".to_string(),
        email: "kim@senji.shop".to_string(),
        role: Some(AdminRole::Admin),
    }
}

/// Backend record of the "Tee": $10 in category `c1`, size S with stock 5.
#[must_use]
pub fn tee_record() -> Value {
    json!({
        "_id": "p1",
        "name": "Tee",
        "price": 10,
        "category_id": "c1",
        "description": "",
        "variants": [{"size": "S", "stock": 5}]
    })
}

/// Categories the product tests load: `c1` Shirts (sized), `c2` Mugs (flat).
#[must_use]
pub fn categories_record() -> Value {
    json!({
        "categories": [
            {"_id": "c1", "name": "Shirts", "uses_sizes": true},
            {"_id": "c2", "name": "Mugs", "uses_sizes": false}
        ]
    })
}

/// Backend record of an order in the given status.
#[must_use]
pub fn order_record(id: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "user": {"_id": "u1", "name": "Ada"},
        "orderItems": [{"name": "Tee", "size": "S", "quantity": 1, "price": "10.00"}],
        "total": "10.00",
        "status": status,
        "created_at": "2024-05-01T12:00:00Z"
    })
}
