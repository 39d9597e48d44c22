//! Dashboard summary metrics.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Headline numbers shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_orders: u64,
    pub total_products: u64,
    pub total_customers: u64,
    pub total_revenue: Decimal,
}
