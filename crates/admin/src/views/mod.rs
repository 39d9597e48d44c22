//! Read-side views over the backend: cached lists the console displays and
//! keeps current from mutation responses.

pub mod catalog;
pub mod categories;
pub mod dashboard;
pub mod orders;

pub use catalog::{Catalog, CategoryFilter};
pub use categories::CategoryList;
pub use dashboard::Dashboard;
pub use orders::{DEFAULT_PAGE_SIZE, OrderBoard};
