//! Product catalog view.
//!
//! A client-side cache of the product list. Every mutation response
//! replaces the cached copy of the affected product.

use tracing::instrument;

use senji_core::{Category, Product, ProductId};

use crate::api::ApiClient;
use crate::error::ConsoleError;

/// Category filter for the product list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    /// A category id or name.
    Only(String),
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }
}

/// Cached products plus the categories needed to label them.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<Category>,
}

impl Catalog {
    #[must_use]
    pub const fn new(products: Vec<Product>, categories: Vec<Category>) -> Self {
        Self {
            products,
            categories,
        }
    }

    /// Fetch products and categories concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first failure of either request.
    #[instrument(skip(api))]
    pub async fn load(api: &ApiClient) -> Result<Self, ConsoleError> {
        let (products, categories) = tokio::try_join!(api.list_products(), api.list_categories())?;
        Ok(Self::new(products, categories))
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Display name of a product's category, falling back to the raw
    /// reference when the category is not loaded.
    #[must_use]
    pub fn category_label<'a>(&'a self, product: &'a Product) -> &'a str {
        product
            .category
            .resolve(&self.categories)
            .map_or_else(|| product.category.as_str(), |c| c.name.as_str())
    }

    /// Distinct category labels across the cached products, in first-seen
    /// order.
    #[must_use]
    pub fn category_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for product in &self.products {
            let label = self.category_label(product);
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }

    /// Products whose name contains `query` (case-insensitive) and whose
    /// category matches `filter` by id or name.
    #[must_use]
    pub fn search(&self, query: &str, filter: &CategoryFilter) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| product.name_matches(query))
            .filter(|product| match filter {
                CategoryFilter::All => true,
                CategoryFilter::Only(wanted) => {
                    product.category.as_str() == wanted
                        || product
                            .category
                            .resolve(&self.categories)
                            .is_some_and(|c| c.id.as_str() == wanted || c.name == *wanted)
                }
            })
            .collect()
    }

    /// Add a newly created product.
    pub fn insert(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Replace the cached copy of an updated product.
    ///
    /// Returns `false` if the product was not cached.
    pub fn replace(&mut self, product: Product) -> bool {
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(slot) => {
                *slot = product;
                true
            }
            None => false,
        }
    }

    /// Drop a deleted product.
    pub fn remove(&mut self, id: &ProductId) -> Option<Product> {
        let index = self.products.iter().position(|p| &p.id == id)?;
        Some(self.products.remove(index))
    }
}
