//! Dashboard view.

use tracing::instrument;

use senji_core::{DashboardStats, Order};

use crate::api::ApiClient;
use crate::error::ConsoleError;

/// Store counters and the latest orders.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub recent_orders: Vec<Order>,
}

impl Dashboard {
    /// Fetch stats and recent orders in parallel.
    ///
    /// # Errors
    ///
    /// Returns the first failure of either request.
    #[instrument(skip(api))]
    pub async fn load(api: &ApiClient) -> Result<Self, ConsoleError> {
        let (stats, recent_orders) =
            tokio::try_join!(api.dashboard_stats(), api.recent_orders())?;
        Ok(Self {
            stats,
            recent_orders,
        })
    }
}
