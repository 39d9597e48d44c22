//! Dashboard endpoints.

use serde_json::Value;
use tracing::instrument;

use senji_core::{DashboardStats, Order};

use super::{ApiClient, ApiError, wire};

impl ApiClient {
    /// Store-wide counters.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let value: Value = self.get("/dashboard/stats", &[]).await?;
        Ok(wire::single(value, "stats")
            .map(|stats| wire::dashboard_stats(&stats))
            .unwrap_or_default())
    }

    /// The most recent orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or an order cannot be decoded.
    #[instrument(skip(self))]
    pub async fn recent_orders(&self) -> Result<Vec<Order>, ApiError> {
        let value: Value = self.get("/dashboard/recent-orders", &[]).await?;
        wire::list(value, &["orders", "data"])?
            .iter()
            .map(wire::order)
            .collect()
    }
}
