//! Core types for the Senji console.
//!
//! This module provides type-safe wrappers for the store's domain concepts.

pub mod admin;
pub mod category;
pub mod dashboard;
pub mod id;
pub mod inventory;
pub mod order;
pub mod price;
pub mod product;
pub mod status;

pub use admin::{AdminProfile, AdminRole, Customer};
pub use category::{Category, CategoryRef, NewCategory};
pub use dashboard::DashboardStats;
pub use id::*;
pub use inventory::{Inventory, Size, SizeParseError, Variant, VariantList, VariantMerge};
pub use order::{CustomerSummary, LineItem, Order, OrderPage, Pagination};
pub use price::{Price, PriceParseError, format_money};
pub use product::Product;
pub use status::{OrderStatus, StatusParseError};
