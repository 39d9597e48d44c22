//! Wire adapter for the backend's JSON payloads.
//!
//! The backend is inconsistent about key names, number encodings and
//! response envelopes. Every quirk is absorbed here so the rest of the crate
//! only sees `senji_core` types with required fields:
//!
//! - ids under `id` or `_id`
//! - numbers that arrive as JSON strings
//! - a product's category under `category_id` (an id) or `category` (an id,
//!   a name, or a populated object)
//! - categories without `uses_sizes` (treated as size-based)
//! - order items under `orderItems`, `items`, `order_items`, `products` or
//!   `line_items`, and the customer under `user` or `customer`
//! - lists that are bare arrays or wrapped in `orders` / `data`
//! - single records that are bare, wrapped in `data` or in their entity key,
//!   or a one-element array

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

use senji_core::{
    AdminId, AdminProfile, AdminRole, Category, CategoryId, CategoryRef, Customer, CustomerId,
    CustomerSummary, DashboardStats, Inventory, LineItem, Order, OrderId, OrderPage, OrderStatus,
    Pagination, Price, Product, ProductId, Size, Variant, VariantList,
};

use super::ApiError;

const ITEM_KEYS: [&str; 5] = ["orderItems", "items", "order_items", "products", "line_items"];

// =============================================================================
// Scalar helpers
// =============================================================================

/// First non-null value under any of `keys`.
fn field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find(|v| !v.is_null())
}

/// A string or number rendered as a non-empty string.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_decimal(input: &str) -> Option<Decimal> {
    let input = input.trim();
    Decimal::from_str(input)
        .or_else(|_| Decimal::from_scientific(input))
        .ok()
        .map(|d| d.normalize())
}

/// A number or numeric string as a decimal.
fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

/// A whole, non-negative number or numeric string.
fn count<T: TryFrom<u64>>(value: &Value) -> Option<T> {
    if let Some(n) = value.as_u64() {
        return T::try_from(n).ok();
    }
    let amount = decimal(value)?;
    if amount.fract() != Decimal::ZERO || amount.is_sign_negative() {
        return None;
    }
    amount.to_u64().and_then(|n| T::try_from(n).ok())
}

fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_u64().map(|n| n != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn record_id(value: &Value) -> Option<String> {
    field(value, &["id", "_id"]).and_then(text)
}

fn required<T>(entity: &str, name: &str, value: Option<T>) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::Decode(format!("{entity} is missing a valid `{name}`")))
}

// =============================================================================
// Envelopes
// =============================================================================

/// Unwrap a single record from its envelope.
///
/// Accepts the record bare, under `key`, under `data`, or as the first
/// element of an array.
#[must_use]
pub fn single(value: Value, key: &str) -> Option<Value> {
    let value = match value {
        Value::Object(mut map) => match map.remove(key).or_else(|| map.remove("data")) {
            Some(inner) if !inner.is_null() => inner,
            _ => Value::Object(map),
        },
        other => other,
    };
    match value {
        Value::Array(items) => items.into_iter().next(),
        Value::Null => None,
        other => Some(other),
    }
}

/// Unwrap a list payload: a bare array, or one wrapped under any of `keys`.
///
/// # Errors
///
/// Returns `ApiError::Decode` when no array can be found.
pub fn list(value: Value, keys: &[&str]) -> Result<Vec<Value>, ApiError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => keys
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| ApiError::Decode("expected a list payload".to_string())),
        Value::Null => Ok(Vec::new()),
        _ => Err(ApiError::Decode("expected a list payload".to_string())),
    }
}

// =============================================================================
// Entities
// =============================================================================

/// Decode a category.
///
/// # Errors
///
/// Returns `ApiError::Decode` when the id or name is missing.
pub fn category(value: &Value) -> Result<Category, ApiError> {
    Ok(Category {
        id: CategoryId::new(required("category", "id", record_id(value))?),
        name: required("category", "name", field(value, &["name"]).and_then(text))?,
        uses_sizes: field(value, &["uses_sizes"])
            .and_then(flag)
            .unwrap_or_else(senji_core::category::default_uses_sizes),
    })
}

fn category_ref(value: &Value) -> Option<(CategoryRef, Option<bool>)> {
    if let Some(id) = field(value, &["category_id"]).and_then(text) {
        return Some((CategoryRef::Id(CategoryId::new(id)), None));
    }
    match field(value, &["category"])? {
        populated @ Value::Object(_) => {
            let uses_sizes = field(populated, &["uses_sizes"]).and_then(flag);
            record_id(populated)
                .map(|id| CategoryRef::Id(CategoryId::new(id)))
                .or_else(|| {
                    field(populated, &["name"])
                        .and_then(text)
                        .map(CategoryRef::Name)
                })
                .map(|reference| (reference, uses_sizes))
        }
        other => text(other).map(|name| (CategoryRef::Name(name), None)),
    }
}

fn variant(value: &Value) -> Result<Variant, ApiError> {
    let size = required("variant", "size", field(value, &["size"]).and_then(text))?;
    let size = Size::from_str(&size).map_err(|e| ApiError::Decode(e.to_string()))?;
    let stock = field(value, &["stock"]).map_or(Some(0), count::<u32>);
    Ok(Variant::new(size, required("variant", "stock", stock)?))
}

fn variants(value: &Value) -> Result<Vec<Variant>, ApiError> {
    match field(value, &["variants"]) {
        Some(Value::Array(items)) => items.iter().map(variant).collect(),
        // multipart echoes the field back as a JSON string
        Some(Value::String(raw)) if !raw.trim().is_empty() => {
            let parsed: Value = serde_json::from_str(raw)?;
            variants(&serde_json::json!({ "variants": parsed }))
        }
        _ => Ok(Vec::new()),
    }
}

/// Decode a product.
///
/// Inventory is sized when the product carries variants, flat when it
/// carries a stock figure or its category is flagged as not size-based, and
/// an empty sized list otherwise.
///
/// # Errors
///
/// Returns `ApiError::Decode` when the id, name, price or category is
/// missing, or a variant is malformed.
pub fn product(value: &Value) -> Result<Product, ApiError> {
    let id = required("product", "id", record_id(value))?;
    let name = required("product", "name", field(value, &["name"]).and_then(text))?;
    let price = required("product", "price", field(value, &["price"]).and_then(decimal))?;
    let (category, category_sizes) = required("product", "category", category_ref(value))?;

    let variants = variants(value)?;
    let stock = field(value, &["stock"]).and_then(count::<u32>);
    let uses_sizes = field(value, &["uses_sizes"])
        .and_then(flag)
        .or(category_sizes);
    let inventory = if !variants.is_empty() {
        Inventory::Sized(VariantList::from_variants(variants))
    } else if let Some(stock) = stock {
        Inventory::Flat(stock)
    } else if uses_sizes == Some(false) {
        Inventory::Flat(0)
    } else {
        Inventory::Sized(VariantList::new())
    };

    Ok(Product {
        id: ProductId::new(id),
        name,
        price: Price::new(price),
        category,
        description: field(value, &["description"])
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        image_url: field(value, &["image_url", "image"]).and_then(text),
        inventory,
    })
}

fn customer_summary(value: &Value) -> Option<CustomerSummary> {
    match field(value, &["user", "customer"]) {
        Some(person @ Value::Object(_)) => Some(CustomerSummary {
            id: record_id(person).map(CustomerId::new),
            name: field(person, &["name"]).and_then(text),
        }),
        Some(other) => text(other).map(|id| CustomerSummary {
            id: Some(CustomerId::new(id)),
            name: None,
        }),
        None => field(value, &["user_id", "customer_id"])
            .and_then(text)
            .map(|id| CustomerSummary {
                id: Some(CustomerId::new(id)),
                name: None,
            }),
    }
}

fn line_item(value: &Value) -> LineItem {
    LineItem {
        product_name: field(value, &["name", "product_name"])
            .and_then(text)
            .unwrap_or_else(|| "Product".to_string()),
        size: field(value, &["size"])
            .and_then(text)
            .and_then(|s| Size::from_str(&s).ok()),
        quantity: field(value, &["quantity", "qty"])
            .and_then(count::<u32>)
            .unwrap_or_default(),
        unit_price: field(value, &["price", "unit_price"])
            .and_then(decimal)
            .unwrap_or_default(),
    }
}

/// Decode an order.
///
/// A missing total reads as zero and an unrecognised status as
/// `Processing`.
///
/// # Errors
///
/// Returns `ApiError::Decode` when the id is missing.
pub fn order(value: &Value) -> Result<Order, ApiError> {
    let items = ITEM_KEYS
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_array))
        .map(|items| items.iter().map(line_item).collect())
        .unwrap_or_default();

    Ok(Order {
        id: OrderId::new(required("order", "id", record_id(value))?),
        customer: customer_summary(value),
        items,
        total: field(value, &["total", "total_amount"])
            .and_then(decimal)
            .unwrap_or_default(),
        status: field(value, &["status"])
            .and_then(Value::as_str)
            .and_then(|s| OrderStatus::from_str(s).ok())
            .unwrap_or_default(),
        created_at: field(value, &["created_at", "createdAt"]).and_then(timestamp),
    })
}

fn pagination(value: &Value) -> Option<Pagination> {
    let source = match value.get("pagination") {
        Some(meta @ Value::Object(_)) => meta,
        _ => value,
    };
    let current_page = field(source, &["current_page"]).and_then(count::<u32>)?;
    Some(Pagination {
        current_page,
        last_page: field(source, &["last_page"])
            .and_then(count::<u32>)
            .unwrap_or(current_page),
        total: field(source, &["total"])
            .and_then(count::<u64>)
            .unwrap_or_default(),
    })
}

/// Decode an order listing with its pagination metadata.
///
/// # Errors
///
/// Returns `ApiError::Decode` when no order list is present or an order
/// lacks an id.
pub fn order_page(value: Value) -> Result<OrderPage, ApiError> {
    let pagination = pagination(&value);
    let orders = list(value, &["orders", "data"])?
        .iter()
        .map(order)
        .collect::<Result<_, _>>()?;
    Ok(OrderPage { orders, pagination })
}

/// Decode dashboard counters; anything missing reads as zero.
#[must_use]
pub fn dashboard_stats(value: &Value) -> DashboardStats {
    let total = |keys: &[&str]| field(value, keys).and_then(count::<u64>).unwrap_or_default();
    DashboardStats {
        total_orders: total(&["totalOrders", "total_orders"]),
        total_products: total(&["totalProducts", "total_products"]),
        total_customers: total(&["totalCustomers", "total_customers"]),
        total_revenue: field(value, &["totalRevenue", "total_revenue"])
            .and_then(decimal)
            .unwrap_or_default(),
    }
}

/// Decode an admin profile.
#[must_use]
pub fn admin_profile(value: &Value) -> AdminProfile {
    AdminProfile {
        id: record_id(value).map(AdminId::new),
        name: field(value, &["name"])
            .and_then(text)
            .unwrap_or_default(),
        email: field(value, &["email"])
            .and_then(text)
            .unwrap_or_default(),
        role: field(value, &["role"])
            .and_then(Value::as_str)
            .map(AdminRole::from),
    }
}

/// Decode a customer account.
///
/// # Errors
///
/// Returns `ApiError::Decode` when the id is missing.
pub fn customer(value: &Value) -> Result<Customer, ApiError> {
    let order_count = match field(value, &["orders", "orders_count", "order_count"]) {
        Some(Value::Array(orders)) => u32::try_from(orders.len()).unwrap_or(u32::MAX),
        Some(other) => count::<u32>(other).unwrap_or_default(),
        None => 0,
    };
    Ok(Customer {
        id: CustomerId::new(required("customer", "id", record_id(value))?),
        name: field(value, &["name"])
            .and_then(text)
            .unwrap_or_default(),
        email: field(value, &["email"])
            .and_then(text)
            .unwrap_or_default(),
        order_count,
    })
}
