//! Reusable presentation components.

pub mod table;

pub use table::{Align, TableColumn, TableConfig};
