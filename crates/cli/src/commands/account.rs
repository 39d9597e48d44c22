//! Profile, dashboard and customer listings.

use std::fmt::Write;

use senji_admin::ApiClient;
use senji_admin::components::table::{customers_table_config, orders_table_config};
use senji_admin::services::AuthService;
use senji_admin::views::Dashboard;
use senji_core::format_money;

use super::CliError;
use super::orders::order_rows;

/// Show the signed-in admin, refreshed from the backend.
pub async fn me(auth: &AuthService) -> Result<String, CliError> {
    let admin = auth.refresh_profile().await?;
    let mut out = String::new();
    let _ = writeln!(out, "Name:  {}", admin.name);
    let _ = writeln!(out, "Email: {}", admin.email);
    if let Some(role) = &admin.role {
        let _ = writeln!(out, "Role:  {role}");
    }
    Ok(out)
}

pub async fn dashboard(api: &ApiClient) -> Result<String, CliError> {
    let dashboard = Dashboard::load(api).await?;
    let stats = &dashboard.stats;

    let mut out = String::new();
    let _ = writeln!(out, "Orders:    {}", stats.total_orders);
    let _ = writeln!(out, "Products:  {}", stats.total_products);
    let _ = writeln!(out, "Customers: {}", stats.total_customers);
    let _ = writeln!(out, "Revenue:   {}", format_money(stats.total_revenue));
    let _ = writeln!(out);
    let _ = writeln!(out, "Recent orders");
    out.push_str(&orders_table_config().render(&order_rows(&dashboard.recent_orders)));
    Ok(out)
}

pub async fn customers(api: &ApiClient) -> Result<String, CliError> {
    let customers = api.list_customers().await?;
    let rows: Vec<Vec<String>> = customers
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.name.clone(),
                c.email.clone(),
                c.order_count.to_string(),
            ]
        })
        .collect();
    Ok(customers_table_config().render(&rows))
}
