//! Order commands.

use std::fmt::Write;

use clap::Subcommand;

use senji_admin::components::table::{line_items_table_config, orders_table_config};
use senji_admin::services::{AuthError, StatusOutcome};
use senji_admin::views::{DEFAULT_PAGE_SIZE, OrderBoard};
use senji_admin::ConsoleError;
use senji_core::{Order, OrderId, OrderStatus, format_money};

use super::{CliError, Console};

#[derive(Debug, Subcommand)]
pub enum OrderAction {
    /// List one page of orders
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: u32,
    },
    /// Show an order with its line items
    Show {
        /// Order ID
        id: String,
    },
    /// Change an order's status
    SetStatus {
        /// Order ID
        id: String,

        /// Processing, Shipped, Delivered or Cancelled
        status: OrderStatus,
    },
}

pub async fn run(console: &mut Console, action: OrderAction) -> Result<String, CliError> {
    match action {
        OrderAction::List { page, limit } => {
            console.board = OrderBoard::load(&console.api, page, limit).await?;
            for order in console.board.orders() {
                if let Some(control) = console.controls.get(&order.id) {
                    control.refresh(order.clone());
                }
            }
            Ok(render_board(&console.board))
        }
        OrderAction::Show { id } => {
            let order = console.board.select(&console.api, &OrderId::new(id)).await?;
            Ok(render_order(order))
        }
        OrderAction::SetStatus { id, status } => set_status(console, &OrderId::new(id), status).await,
    }
}

/// Load the order behind `id`, preferring the copy already on the board.
pub(crate) async fn current_order(console: &Console, id: &OrderId) -> Result<Order, CliError> {
    if let Some(order) = console
        .board
        .selected()
        .filter(|o| &o.id == id)
        .or_else(|| console.board.find(id))
    {
        return Ok(order.clone());
    }
    Ok(console.api.get_order(id).await?)
}

async fn set_status(
    console: &mut Console,
    id: &OrderId,
    status: OrderStatus,
) -> Result<String, CliError> {
    let order = current_order(console, id).await?;
    let control = console.control_for(order);
    let board = &mut console.board;
    let outcome = control
        .change(&console.api, status, |order| board.apply_status_change(order))
        .await
        .map_err(ConsoleError::from)?;
    describe_outcome(&outcome)
}

/// Render a settled status change, or the error that undid it.
pub(crate) fn describe_outcome(outcome: &StatusOutcome) -> Result<String, CliError> {
    match outcome {
        StatusOutcome::Unchanged => Ok("Status unchanged\n".to_string()),
        StatusOutcome::Committed(order) => Ok(format!(
            "Order #{} is now {}\n",
            order.id.short(),
            order.status
        )),
        StatusOutcome::RolledBack { error, .. } => Err(error.clone().into()),
        StatusOutcome::SessionExpired { .. } => Err(AuthError::SessionExpired.into()),
    }
}

pub(crate) fn order_rows(orders: &[Order]) -> Vec<Vec<String>> {
    orders
        .iter()
        .map(|order| {
            vec![
                format!("#{}", order.id.short()),
                order.customer_label().to_string(),
                order
                    .created_at
                    .map(|at| at.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                format_money(order.total),
                order.status.to_string(),
            ]
        })
        .collect()
}

fn render_board(board: &OrderBoard) -> String {
    let mut out = orders_table_config().render(&order_rows(board.orders()));
    if let Some(pagination) = board.pagination() {
        let _ = writeln!(
            out,
            "Page {} of {} ({} orders)",
            pagination.current_page, pagination.last_page, pagination.total
        );
    }
    out
}

fn render_order(order: &Order) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order #{} ({})", order.id.short(), order.id);
    let _ = writeln!(out, "Customer: {}", order.customer_label());
    if let Some(at) = order.created_at {
        let _ = writeln!(out, "Placed:   {}", at.format("%Y-%m-%d %H:%M"));
    }
    let _ = writeln!(out, "Status:   {}", order.status);
    let _ = writeln!(out);

    let rows: Vec<Vec<String>> = order
        .items
        .iter()
        .map(|item| {
            vec![
                item.product_name.clone(),
                item.size.map(|s| s.to_string()).unwrap_or_default(),
                item.quantity.to_string(),
                format_money(item.unit_price),
                format_money(item.subtotal()),
            ]
        })
        .collect();
    out.push_str(&line_items_table_config().render(&rows));
    let _ = writeln!(out, "Total: {}", format_money(order.total));
    out
}
