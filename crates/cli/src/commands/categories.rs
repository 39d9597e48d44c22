//! Category commands.

use clap::Subcommand;
use tracing::info;

use senji_admin::ApiClient;
use senji_admin::api::ApiError;
use senji_admin::components::table::categories_table_config;
use senji_admin::forms::CategoryForm;
use senji_admin::views::CategoryList;
use senji_core::CategoryId;

use super::{CliError, parse_bool};

#[derive(Debug, Subcommand)]
pub enum CategoryAction {
    /// List categories
    List,
    /// Create a category
    Add {
        name: String,

        /// The category's products have no sizes
        #[arg(long)]
        no_sizes: bool,
    },
    /// Edit a category
    Edit {
        /// Category ID or name
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, value_parser = parse_bool)]
        uses_sizes: Option<bool>,
    },
    /// Delete a category
    Delete {
        /// Category ID
        id: String,
    },
}

pub async fn run(api: &ApiClient, action: CategoryAction) -> Result<String, CliError> {
    match action {
        CategoryAction::List => {
            let list = CategoryList::load(api).await?;
            let rows: Vec<Vec<String>> = list
                .categories()
                .iter()
                .map(|c| {
                    vec![
                        c.id.to_string(),
                        c.name.clone(),
                        if c.uses_sizes { "yes" } else { "no" }.to_string(),
                    ]
                })
                .collect();
            Ok(categories_table_config().render(&rows))
        }
        CategoryAction::Add { name, no_sizes } => {
            let mut form = CategoryForm::new();
            form.set_name(name);
            form.set_uses_sizes(!no_sizes);
            let category = form.submit(api).await?;
            Ok(format!("Created category {} ({})\n", category.name, category.id))
        }
        CategoryAction::Edit {
            id,
            name,
            uses_sizes,
        } => {
            let list = CategoryList::load(api).await?;
            let existing = list
                .lookup(&id)
                .ok_or_else(|| ApiError::NotFound(format!("Category {id} not found")))?;
            let mut form = CategoryForm::edit(existing);
            if let Some(name) = name {
                form.set_name(name);
            }
            if let Some(uses_sizes) = uses_sizes {
                form.set_uses_sizes(uses_sizes);
            }
            let category = form.submit(api).await?;
            Ok(format!("Updated category {} ({})\n", category.name, category.id))
        }
        CategoryAction::Delete { id } => {
            let id = CategoryId::new(id);
            api.delete_category(&id).await?;
            info!(category_id = %id, "Category deleted");
            Ok(format!("Deleted category {id}\n"))
        }
    }
}
