//! Order endpoints.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use senji_core::{Order, OrderId, OrderPage, OrderStatus};

use super::{ApiClient, ApiError, wire};

#[derive(Serialize)]
struct StatusRequest {
    status: OrderStatus,
}

impl ApiClient {
    /// List one page of orders.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or an order cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, page: u32, limit: u32) -> Result<OrderPage, ApiError> {
        let value: Value = self
            .get(
                "/orders",
                &[("page", page.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        wire::order_page(value)
    }

    /// Get a single order with its line items.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no such order exists.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        let value: Value = self.get(&format!("/orders/{id}"), &[]).await?;
        let record = wire::single(value, "order")
            .ok_or_else(|| ApiError::NotFound(format!("order {id}")))?;
        wire::order(&record)
    }

    /// Set an order's status.
    ///
    /// Returns the backend's copy of the order when the response carries
    /// one. A success reply without a readable order, including a plain
    /// text body, returns `None`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the session has expired, or
    /// another error if the backend rejects the change.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, ApiError> {
        let Some(value) = self
            .send_json_lenient(
                Method::PUT,
                &format!("/orders/{id}/status"),
                &StatusRequest { status },
            )
            .await?
        else {
            return Ok(None);
        };
        let record = wire::single(value, "order")
            .filter(|record| record.get("id").or_else(|| record.get("_id")).is_some());
        Ok(record.and_then(|record| match wire::order(&record) {
            Ok(order) => Some(order),
            Err(e) => {
                debug!(error = %e, "Status reply carried an unreadable order");
                None
            }
        }))
    }
}
