//! Order board view.
//!
//! One page of orders plus an optional selected order shown in detail.
//! Status changes made through a status control are applied to both so the
//! table row and the detail view never disagree.

use tracing::instrument;

use senji_core::{Order, OrderId, OrderPage, Pagination};

use crate::api::ApiClient;
use crate::error::ConsoleError;

/// Orders per page when none is given.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A page of orders and the selected order's details.
#[derive(Debug, Clone)]
pub struct OrderBoard {
    orders: Vec<Order>,
    pagination: Option<Pagination>,
    page: u32,
    limit: u32,
    selected: Option<Order>,
}

impl OrderBoard {
    #[must_use]
    pub fn new(page: OrderPage, page_number: u32, limit: u32) -> Self {
        Self {
            orders: page.orders,
            pagination: page.pagination,
            page: page_number.max(1),
            limit,
            selected: None,
        }
    }

    /// Fetch one page of orders.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(api))]
    pub async fn load(api: &ApiClient, page: u32, limit: u32) -> Result<Self, ConsoleError> {
        let page = page.max(1);
        let limit = if limit == 0 { DEFAULT_PAGE_SIZE } else { limit };
        let listing = api.list_orders(page, limit).await?;
        Ok(Self::new(listing, page, limit))
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub const fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub const fn selected(&self) -> Option<&Order> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn find(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }

    /// Load an order's details and select it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` (wrapped) if the order does not exist.
    #[instrument(skip(self, api), fields(order_id = %id))]
    pub async fn select(&mut self, api: &ApiClient, id: &OrderId) -> Result<&Order, ConsoleError> {
        let order = api.get_order(id).await?;
        Ok(&*self.selected.insert(order))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Apply an order reported by a status control.
    ///
    /// The matching row is replaced and, if the same order is selected, its
    /// status is updated in place so the loaded line items survive.
    pub fn apply_status_change(&mut self, order: &Order) {
        if let Some(row) = self.orders.iter_mut().find(|o| o.id == order.id) {
            *row = order.clone();
        }
        if let Some(selected) = self.selected.as_mut().filter(|s| s.id == order.id) {
            selected.status = order.status;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use senji_core::{LineItem, OrderStatus};

    fn order(id: &str, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(id),
            customer: None,
            items: vec![],
            total: Decimal::ZERO,
            status,
            created_at: None,
        }
    }

    fn board() -> OrderBoard {
        OrderBoard::new(
            OrderPage {
                orders: vec![
                    order("o1", OrderStatus::Processing),
                    order("o2", OrderStatus::Processing),
                ],
                pagination: None,
            },
            1,
            DEFAULT_PAGE_SIZE,
        )
    }

    #[test]
    fn test_status_change_updates_row_and_selection() {
        let mut board = board();
        let mut detailed = order("o2", OrderStatus::Processing);
        detailed.items.push(LineItem {
            product_name: "Tee".to_string(),
            size: None,
            quantity: 1,
            unit_price: Decimal::TEN,
        });
        board.selected = Some(detailed);

        board.apply_status_change(&order("o2", OrderStatus::Shipped));

        assert_eq!(board.orders()[0].status, OrderStatus::Processing);
        assert_eq!(board.orders()[1].status, OrderStatus::Shipped);
        let selected = board.selected().unwrap();
        assert_eq!(selected.status, OrderStatus::Shipped);
        assert_eq!(selected.items.len(), 1);
    }

    #[test]
    fn test_status_change_for_other_order_leaves_selection() {
        let mut board = board();
        board.selected = Some(order("o1", OrderStatus::Processing));
        board.apply_status_change(&order("o2", OrderStatus::Cancelled));
        assert_eq!(board.selected().unwrap().status, OrderStatus::Processing);
    }

    #[test]
    fn test_page_number_is_at_least_one() {
        let board = OrderBoard::new(
            OrderPage {
                orders: vec![],
                pagination: None,
            },
            0,
            5,
        );
        assert_eq!(board.page(), 1);
        assert_eq!(board.limit(), 5);
    }
}
