//! Customer account endpoints.

use serde_json::Value;
use tracing::instrument;

use senji_core::Customer;

use super::{ApiClient, ApiError, wire};

impl ApiClient {
    /// List registered customer accounts.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or an account cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_customers(&self) -> Result<Vec<Customer>, ApiError> {
        let value: Value = self.get("/admin/users", &[]).await?;
        wire::list(value, &["users", "customers", "data"])?
            .iter()
            .map(wire::customer)
            .collect()
    }
}
