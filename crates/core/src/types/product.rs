//! Catalog products.

use serde::{Deserialize, Serialize};

use super::category::CategoryRef;
use super::id::ProductId;
use super::inventory::{Inventory, VariantList};
use super::price::Price;

/// A product as known to the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub category: CategoryRef,
    pub description: String,
    /// Public URL of the product image, when one has been uploaded.
    pub image_url: Option<String>,
    pub inventory: Inventory,
}

impl Product {
    /// Variants when stock is tracked per size, otherwise `None`.
    #[must_use]
    pub const fn variants(&self) -> Option<&VariantList> {
        self.inventory.variants()
    }

    /// Whether the product is stocked per size.
    #[must_use]
    pub const fn uses_sizes(&self) -> bool {
        matches!(self.inventory, Inventory::Sized(_))
    }

    /// Case-insensitive substring match on the product name.
    #[must_use]
    pub fn name_matches(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty() || self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::id::CategoryId;
    use crate::types::inventory::{Size, Variant};

    fn tee() -> Product {
        Product {
            id: ProductId::new("p1"),
            name: "Classic Tee".to_string(),
            price: Price::from_cents(1000),
            category: CategoryRef::Id(CategoryId::new("c1")),
            description: String::new(),
            image_url: None,
            inventory: Inventory::Sized(VariantList::from_variants([Variant::new(Size::S, 5)])),
        }
    }

    #[test]
    fn test_name_matches_case_insensitive() {
        let product = tee();
        assert!(product.name_matches("tee"));
        assert!(product.name_matches("CLASSIC"));
        assert!(product.name_matches(""));
        assert!(!product.name_matches("mug"));
    }

    #[test]
    fn test_uses_sizes_follows_inventory() {
        let mut product = tee();
        assert!(product.uses_sizes());
        product.inventory = Inventory::Flat(3);
        assert!(!product.uses_sizes());
        assert!(product.variants().is_none());
    }
}
