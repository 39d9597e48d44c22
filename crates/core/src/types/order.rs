//! Customer orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CustomerId, OrderId};
use super::inventory::Size;
use super::status::OrderStatus;

/// Who placed an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: Option<CustomerId>,
    pub name: Option<String>,
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_name: String,
    pub size: Option<Size>,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl LineItem {
    /// Quantity times unit price.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// `None` for guest checkouts.
    pub customer: Option<CustomerSummary>,
    pub items: Vec<LineItem>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Label shown in the customer column.
    ///
    /// The customer's name when known, "Customer" for a registered customer
    /// without a name on record, and "Guest" otherwise.
    #[must_use]
    pub fn customer_label(&self) -> &str {
        match &self.customer {
            Some(CustomerSummary {
                name: Some(name), ..
            }) if !name.trim().is_empty() => name,
            Some(CustomerSummary { id: Some(_), .. }) => "Customer",
            _ => "Guest",
        }
    }

    /// Copy of this order with a different status.
    #[must_use]
    pub fn with_status(&self, status: OrderStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

/// Pagination metadata returned alongside order listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub last_page: u32,
    pub total: u64,
}

impl Pagination {
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current_page > 1
    }
}

/// One page of orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub pagination: Option<Pagination>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(customer: Option<CustomerSummary>) -> Order {
        Order {
            id: OrderId::new("o1"),
            customer,
            items: vec![],
            total: Decimal::ZERO,
            status: OrderStatus::Processing,
            created_at: None,
        }
    }

    #[test]
    fn test_customer_label() {
        assert_eq!(order(None).customer_label(), "Guest");
        assert_eq!(
            order(Some(CustomerSummary {
                id: Some(CustomerId::new("u1")),
                name: None
            }))
            .customer_label(),
            "Customer"
        );
        assert_eq!(
            order(Some(CustomerSummary {
                id: None,
                name: Some("Ada".to_string())
            }))
            .customer_label(),
            "Ada"
        );
        assert_eq!(
            order(Some(CustomerSummary {
                id: None,
                name: None
            }))
            .customer_label(),
            "Guest"
        );
    }

    #[test]
    fn test_with_status_keeps_everything_else() {
        let original = order(None);
        let shipped = original.with_status(OrderStatus::Shipped);
        assert_eq!(shipped.status, OrderStatus::Shipped);
        assert_eq!(shipped.id, original.id);
        assert_eq!(original.status, OrderStatus::Processing);
    }

    #[test]
    fn test_line_item_subtotal() {
        let item = LineItem {
            product_name: "Tee".to_string(),
            size: Some(Size::M),
            quantity: 3,
            unit_price: Decimal::new(1250, 2),
        };
        assert_eq!(item.subtotal(), Decimal::new(3750, 2));
    }

    #[test]
    fn test_pagination_navigation() {
        let page = Pagination {
            current_page: 1,
            last_page: 3,
            total: 25,
        };
        assert!(page.has_next());
        assert!(!page.has_previous());
    }
}
