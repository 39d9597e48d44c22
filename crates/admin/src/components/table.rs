//! Plain-text table component.
//!
//! Tables are configured once per listing (columns, empty state) and then
//! rendered from rows of already-formatted cells.

use std::fmt::Write;

/// Horizontal alignment of a column's cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// Column definition for a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Header label.
    pub label: String,
    pub align: Align,
}

impl TableColumn {
    /// Create a new left-aligned column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            align: Align::Left,
        }
    }

    /// Right-align this column (amounts, counts).
    #[must_use]
    pub const fn right(mut self) -> Self {
        self.align = Align::Right;
        self
    }
}

/// Configuration for a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Unique table identifier.
    pub table_id: String,
    pub columns: Vec<TableColumn>,
    /// Line printed instead of the table when there are no rows.
    pub empty_title: String,
}

impl TableConfig {
    /// Create a new table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            empty_title: "No items found".to_string(),
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Set the empty state line.
    #[must_use]
    pub fn empty_state(mut self, title: &str) -> Self {
        self.empty_title = title.to_string();
        self
    }

    /// Render rows under a header line.
    ///
    /// Missing cells render blank; cells beyond the last column are dropped.
    #[must_use]
    pub fn render(&self, rows: &[Vec<String>]) -> String {
        if rows.is_empty() {
            return format!("{}\n", self.empty_title);
        }

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                rows.iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(column.label.chars().count()))
                    .max()
                    .unwrap_or_default()
            })
            .collect();

        let mut out = String::new();
        let header: Vec<&str> = self.columns.iter().map(|c| c.label.as_str()).collect();
        self.write_line(&mut out, &header, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let rule: Vec<&str> = rule.iter().map(String::as_str).collect();
        self.write_line(&mut out, &rule, &widths);
        for row in rows {
            let cells: Vec<&str> = (0..self.columns.len())
                .map(|i| row.get(i).map_or("", String::as_str))
                .collect();
            self.write_line(&mut out, &cells, &widths);
        }
        out
    }

    fn write_line(&self, out: &mut String, cells: &[&str], widths: &[usize]) {
        let line = self
            .columns
            .iter()
            .zip(cells)
            .zip(widths)
            .map(|((column, cell), width)| match column.align {
                Align::Left => format!("{cell:<width$}"),
                Align::Right => format!("{cell:>width$}"),
            })
            .collect::<Vec<_>>()
            .join("  ");
        let _ = writeln!(out, "{}", line.trim_end());
    }
}

/// Product listing.
#[must_use]
pub fn products_table_config() -> TableConfig {
    TableConfig::new("products")
        .column(TableColumn::new("id", "ID"))
        .column(TableColumn::new("name", "Name"))
        .column(TableColumn::new("category", "Category"))
        .column(TableColumn::new("price", "Price").right())
        .column(TableColumn::new("stock", "Stock"))
        .empty_state("No products found")
}

/// Category listing.
#[must_use]
pub fn categories_table_config() -> TableConfig {
    TableConfig::new("categories")
        .column(TableColumn::new("id", "ID"))
        .column(TableColumn::new("name", "Name"))
        .column(TableColumn::new("sizes", "Sizes"))
        .empty_state("No categories found")
}

/// Order listing.
#[must_use]
pub fn orders_table_config() -> TableConfig {
    TableConfig::new("orders")
        .column(TableColumn::new("id", "Order"))
        .column(TableColumn::new("customer", "Customer"))
        .column(TableColumn::new("date", "Date"))
        .column(TableColumn::new("total", "Total").right())
        .column(TableColumn::new("status", "Status"))
        .empty_state("No orders found")
}

/// Line items of one order.
#[must_use]
pub fn line_items_table_config() -> TableConfig {
    TableConfig::new("line_items")
        .column(TableColumn::new("product", "Product"))
        .column(TableColumn::new("size", "Size"))
        .column(TableColumn::new("quantity", "Qty").right())
        .column(TableColumn::new("price", "Price").right())
        .column(TableColumn::new("subtotal", "Subtotal").right())
        .empty_state("No items")
}

/// Customer listing.
#[must_use]
pub fn customers_table_config() -> TableConfig {
    TableConfig::new("customers")
        .column(TableColumn::new("id", "ID"))
        .column(TableColumn::new("name", "Name"))
        .column(TableColumn::new("email", "Email"))
        .column(TableColumn::new("orders", "Orders").right())
        .empty_state("No customers found")
}
