//! Product commands.

use std::fmt::Write;
use std::path::PathBuf;

use clap::Subcommand;
use tracing::info;

use senji_admin::ApiClient;
use senji_admin::components::table::products_table_config;
use senji_admin::forms::{EditOutcome, FormError, ImageUpload, ProductForm};
use senji_admin::views::{Catalog, CategoryFilter, CategoryList};
use senji_core::{Inventory, Product, ProductId, Size};

use super::CliError;

#[derive(Debug, Subcommand)]
pub enum ProductAction {
    /// List products
    List {
        /// Case-insensitive name search
        #[arg(long, default_value = "")]
        search: String,

        /// Category ID or name ("all" for every category)
        #[arg(long, default_value = "all")]
        category: String,
    },
    /// Create a product
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        price: String,

        /// Category ID or name
        #[arg(long)]
        category: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Stock per size, e.g. `--size S=5` (repeatable)
        #[arg(long = "size", value_parser = parse_size_stock)]
        sizes: Vec<(Size, String)>,

        /// Stock for categories without sizes
        #[arg(long)]
        stock: Option<String>,

        /// Product image (JPEG, PNG, GIF or WebP, at most 5MB)
        #[arg(long)]
        image: PathBuf,
    },
    /// Edit a product; only the given fields change
    Edit {
        /// Product ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        price: Option<String>,

        /// Category ID or name
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Add stock per size, e.g. `--size M=3` (repeatable)
        #[arg(long = "size", value_parser = parse_size_stock)]
        sizes: Vec<(Size, String)>,

        /// Remove a size (repeatable)
        #[arg(long = "remove-size")]
        remove_sizes: Vec<Size>,

        #[arg(long)]
        stock: Option<String>,

        /// Replace the product image
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete a product
    Delete {
        /// Product ID
        id: String,
    },
}

pub async fn run(api: &ApiClient, action: ProductAction) -> Result<String, CliError> {
    match action {
        ProductAction::List { search, category } => list(api, &search, &category).await,
        ProductAction::Add {
            name,
            price,
            category,
            description,
            sizes,
            stock,
            image,
        } => {
            let categories = CategoryList::load(api).await?;
            let mut form = ProductForm::new(categories.into_inner());
            form.set_name(name);
            form.set_price(price);
            form.set_description(description);
            select_category(&mut form, &category)?;

            let mut out = String::new();
            apply_stock(&mut form, sizes, &[], stock.as_deref(), &mut out)?;
            form.select_image(ImageUpload::from_path(&image).await?);

            let product = form.submit_new(api).await?;
            let _ = writeln!(out, "Created product {} ({})", product.name, product.id);
            Ok(out)
        }
        ProductAction::Edit {
            id,
            name,
            price,
            category,
            description,
            sizes,
            remove_sizes,
            stock,
            image,
        } => {
            let id = ProductId::new(id);
            let (original, categories) =
                tokio::try_join!(api.get_product(&id), api.list_categories())?;
            let mut form = ProductForm::edit(&original, categories);
            if let Some(name) = name {
                form.set_name(name);
            }
            if let Some(price) = price {
                form.set_price(price);
            }
            if let Some(description) = description {
                form.set_description(description);
            }
            if let Some(category) = category {
                select_category(&mut form, &category)?;
            }

            let mut out = String::new();
            apply_stock(&mut form, sizes, &remove_sizes, stock.as_deref(), &mut out)?;
            if let Some(path) = image {
                form.select_image(ImageUpload::from_path(&path).await?);
            }

            match form.submit_edit(api, &original).await? {
                EditOutcome::NoChanges => out.push_str("No changes detected\n"),
                EditOutcome::Updated(product) => {
                    let _ = writeln!(out, "Updated product {} ({})", product.name, product.id);
                }
            }
            Ok(out)
        }
        ProductAction::Delete { id } => {
            let id = ProductId::new(id);
            api.delete_product(&id).await?;
            info!(product_id = %id, "Product deleted");
            Ok(format!("Deleted product {id}\n"))
        }
    }
}

async fn list(api: &ApiClient, search: &str, category: &str) -> Result<String, CliError> {
    let catalog = Catalog::load(api).await?;
    let rows: Vec<Vec<String>> = catalog
        .search(search, &CategoryFilter::from(category))
        .into_iter()
        .map(|product| {
            vec![
                product.id.to_string(),
                product.name.clone(),
                catalog.category_label(product).to_string(),
                product.price.to_string(),
                stock_label(product),
            ]
        })
        .collect();
    Ok(products_table_config().render(&rows))
}

/// Select a category given by ID or name.
fn select_category(form: &mut ProductForm, key: &str) -> Result<(), CliError> {
    let id = CategoryList::new(form.categories().to_vec())
        .lookup(key)
        .map(|c| c.id.clone())
        .ok_or(FormError::MissingCategory)?;
    form.select_category(&id)?;
    Ok(())
}

/// Apply size removals, size additions and flat stock, in that order.
///
/// Duplicate-size warnings are written to `out`.
fn apply_stock(
    form: &mut ProductForm,
    sizes: Vec<(Size, String)>,
    remove_sizes: &[Size],
    stock: Option<&str>,
    out: &mut String,
) -> Result<(), CliError> {
    for size in remove_sizes {
        form.remove_size(*size);
    }
    for (size, quantity) in sizes {
        if let Some(warning) = form.add_variant(size, &quantity)? {
            let _ = writeln!(out, "{warning}");
        }
    }
    if let Some(stock) = stock {
        form.set_stock(stock)?;
    }
    Ok(())
}

fn stock_label(product: &Product) -> String {
    match &product.inventory {
        Inventory::Sized(variants) => variants
            .iter()
            .map(|v| format!("{}:{}", v.size, v.stock))
            .collect::<Vec<_>>()
            .join(" "),
        Inventory::Flat(stock) => stock.to_string(),
    }
}

/// Parse `SIZE=STOCK`; the stock is validated by the form.
fn parse_size_stock(value: &str) -> Result<(Size, String), String> {
    let (size, stock) = value
        .split_once('=')
        .ok_or_else(|| format!("expected SIZE=STOCK, got '{value}'"))?;
    let size = size.parse::<Size>().map_err(|e| e.to_string())?;
    Ok((size, stock.to_string()))
}
