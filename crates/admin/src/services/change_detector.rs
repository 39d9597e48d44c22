//! Edit change detection.
//!
//! Before a product update is sent, the edit is compared against the
//! product as loaded. Both sides are first reduced to a [`ProductDraft`]
//! so that a JSON payload, multipart fields and a decoded product all
//! compare the same way.
//!
//! Variant lists are compared position by position: the same sizes and
//! stock in a different order count as a change.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use senji_core::{Category, Inventory, Product, Variant};

use crate::forms::ProductPayload;

/// Errors when reducing multipart fields to a draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("price field is not a number: {0}")]
    InvalidPrice(String),

    #[error("stock field is not a whole number: {0}")]
    InvalidStock(String),

    #[error("variants field is not a valid variant list: {0}")]
    InvalidVariants(String),
}

/// The fields of a product that an edit can change.
///
/// Text fields are trimmed and missing ones are empty strings. A missing
/// price or stock compares as zero, and an empty variant list is the same
/// as none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub price: Option<Decimal>,
    pub category: String,
    pub description: String,
    pub stock: Option<u32>,
    pub variants: Option<Vec<Variant>>,
}

impl ProductDraft {
    /// Draft of a product as loaded.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        let (stock, variants) = match &product.inventory {
            Inventory::Sized(list) => (None, Some(list.as_slice().to_vec())),
            Inventory::Flat(stock) => (Some(*stock), None),
        };
        Self {
            name: text(&product.name),
            price: Some(product.price.amount()),
            category: text(product.category.as_str()),
            description: text(&product.description),
            stock,
            variants,
        }
    }

    /// Draft of a loaded product, with a by-name category reference
    /// rewritten to the matching category's id.
    #[must_use]
    pub fn from_product_in(product: &Product, categories: &[Category]) -> Self {
        Self {
            category: text(product.category.canonicalize(categories).as_str()),
            ..Self::from_product(product)
        }
    }

    /// Draft of a JSON submission.
    #[must_use]
    pub fn from_payload(payload: &ProductPayload) -> Self {
        Self {
            name: text(&payload.name),
            price: Some(payload.price.amount()),
            category: text(payload.category.as_str()),
            description: text(&payload.description),
            stock: payload.stock,
            variants: payload.variants.clone(),
        }
    }

    /// Draft of a multipart submission's text fields.
    ///
    /// The category is read from `category`, falling back to `category_id`;
    /// variants are a JSON-encoded list in the single `variants` field.
    ///
    /// # Errors
    ///
    /// Returns `DraftError` if the price, stock or variants field is present
    /// but does not parse.
    pub fn from_fields(fields: &[(String, String)]) -> Result<Self, DraftError> {
        let get = |name: &str| {
            fields
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
                .filter(|value| !value.trim().is_empty())
        };

        let price = get("price")
            .map(|raw| {
                Decimal::from_str(raw.trim())
                    .or_else(|_| Decimal::from_scientific(raw.trim()))
                    .map_err(|_| DraftError::InvalidPrice(raw.to_string()))
            })
            .transpose()?;
        let stock = get("stock")
            .map(|raw| {
                raw.trim()
                    .parse::<u32>()
                    .map_err(|_| DraftError::InvalidStock(raw.to_string()))
            })
            .transpose()?;
        let variants = get("variants")
            .map(|raw| {
                serde_json::from_str::<Vec<Variant>>(raw)
                    .map_err(|e| DraftError::InvalidVariants(e.to_string()))
            })
            .transpose()?;

        Ok(Self {
            name: text(get("name").unwrap_or_default()),
            price,
            category: text(get("category").or_else(|| get("category_id")).unwrap_or_default()),
            description: text(get("description").unwrap_or_default()),
            stock,
            variants,
        })
    }

    fn variant_list(&self) -> Option<&[Variant]> {
        self.variants.as_deref().filter(|list| !list.is_empty())
    }
}

fn text(value: &str) -> String {
    value.trim().to_string()
}

/// Whether `candidate` differs from `original`.
///
/// Prices compare numerically, so `10.00` equals `10`.
#[must_use]
pub fn has_changes(candidate: &ProductDraft, original: &ProductDraft) -> bool {
    scalars_differ(candidate, original)
        || candidate.stock.unwrap_or_default() != original.stock.unwrap_or_default()
        || variants_differ(candidate.variant_list(), original.variant_list())
}

fn scalars_differ(candidate: &ProductDraft, original: &ProductDraft) -> bool {
    candidate.name != original.name
        || candidate.price.unwrap_or_default() != original.price.unwrap_or_default()
        || candidate.category != original.category
        || candidate.description != original.description
}

fn variants_differ(candidate: Option<&[Variant]>, original: Option<&[Variant]>) -> bool {
    match (candidate, original) {
        (None, None) => false,
        (Some(candidate), Some(original)) => {
            candidate.len() != original.len()
                || candidate.iter().zip(original).any(|(a, b)| a != b)
        }
        _ => true,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use senji_core::{CategoryId, CategoryRef, Price, ProductId, Size, VariantList};

    fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn tee(variants: &[(Size, u32)]) -> ProductDraft {
        ProductDraft {
            name: "Tee".to_string(),
            price: Some(Decimal::from(10)),
            category: "c1".to_string(),
            description: String::new(),
            stock: None,
            variants: Some(
                variants
                    .iter()
                    .map(|(size, stock)| Variant::new(*size, *stock))
                    .collect(),
            ),
        }
    }

    #[test]
    fn test_identical_edit_has_no_changes() {
        let original = tee(&[(Size::S, 5)]);
        assert!(!has_changes(&tee(&[(Size::S, 5)]), &original));
    }

    #[test]
    fn test_added_variant_is_a_change() {
        let original = tee(&[(Size::S, 5)]);
        assert!(has_changes(&tee(&[(Size::S, 5), (Size::M, 2)]), &original));
    }

    #[test]
    fn test_price_compared_numerically() {
        let original = tee(&[(Size::S, 5)]);
        let candidate = ProductDraft::from_fields(&fields(&[
            ("name", "Tee"),
            ("price", "10.00"),
            ("category", "c1"),
            ("variants", r#"[{"size":"S","stock":5}]"#),
        ]))
        .unwrap();
        assert!(!has_changes(&candidate, &original));
    }

    #[test]
    fn test_reordered_variants_report_a_change() {
        let original = tee(&[(Size::S, 5), (Size::M, 2)]);
        assert!(has_changes(&tee(&[(Size::M, 2), (Size::S, 5)]), &original));
    }

    #[test]
    fn test_variant_presence_asymmetry() {
        let original = tee(&[(Size::S, 5)]);
        let mut candidate = original.clone();
        candidate.variants = None;
        assert!(has_changes(&candidate, &original));
        assert!(has_changes(&original, &candidate));
    }

    #[test]
    fn test_empty_variants_equal_missing() {
        let mut with_empty = tee(&[]);
        let mut without = tee(&[]);
        without.variants = None;
        assert!(!has_changes(&with_empty, &without));
        with_empty.stock = Some(0);
        assert!(!has_changes(&with_empty, &without));
    }

    #[test]
    fn test_missing_stock_is_zero() {
        let mut candidate = tee(&[]);
        candidate.stock = Some(0);
        assert!(!has_changes(&candidate, &tee(&[])));
        candidate.stock = Some(3);
        assert!(has_changes(&candidate, &tee(&[])));
    }

    #[test]
    fn test_missing_description_equals_empty() {
        let candidate = ProductDraft::from_fields(&fields(&[
            ("name", "Tee"),
            ("price", "10"),
            ("category_id", "c1"),
            ("description", ""),
            ("variants", "[]"),
        ]))
        .unwrap();
        let mut original = tee(&[]);
        original.variants = None;
        assert!(!has_changes(&candidate, &original));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let candidate = ProductDraft::from_fields(&fields(&[
            ("name", " Tee"),
            ("price", "10"),
            ("category", "c1 "),
            ("description", "Soft cotton"),
            ("variants", r#"[{"size":"S","stock":5}]"#),
        ]))
        .unwrap();
        let original = ProductDraft::from_fields(&fields(&[
            ("name", "Tee"),
            ("price", "10"),
            ("category_id", "c1"),
            ("description", "Soft cotton\n"),
            ("variants", r#"[{"size":"S","stock":5}]"#),
        ]))
        .unwrap();
        assert!(!has_changes(&candidate, &original));
    }

    #[test]
    fn test_from_fields_rejects_garbage() {
        assert!(matches!(
            ProductDraft::from_fields(&fields(&[("price", "ten")])),
            Err(DraftError::InvalidPrice(_))
        ));
        assert!(matches!(
            ProductDraft::from_fields(&fields(&[("stock", "-1")])),
            Err(DraftError::InvalidStock(_))
        ));
        assert!(matches!(
            ProductDraft::from_fields(&fields(&[("variants", "{oops")])),
            Err(DraftError::InvalidVariants(_))
        ));
    }

    #[test]
    fn test_from_product_in_resolves_category_name() {
        let product = Product {
            id: ProductId::new("p1"),
            name: "Tee".to_string(),
            price: Price::from_cents(1000),
            category: CategoryRef::Name("Shirts".to_string()),
            description: String::new(),
            image_url: None,
            inventory: Inventory::Sized(VariantList::from_variants([Variant::new(Size::S, 5)])),
        };
        let categories = [Category {
            id: CategoryId::new("c1"),
            name: "Shirts".to_string(),
            uses_sizes: true,
        }];
        let draft = ProductDraft::from_product_in(&product, &categories);
        assert_eq!(draft.category, "c1");
        assert!(!has_changes(&tee(&[(Size::S, 5)]), &draft));
    }

    fn arb_variant() -> impl Strategy<Value = Variant> {
        (prop::sample::select(Size::ALL.to_vec()), 0u32..500)
            .prop_map(|(size, stock)| Variant::new(size, stock))
    }

    fn arb_draft() -> impl Strategy<Value = ProductDraft> {
        (
            "[a-zA-Z ]{0,12}",
            prop::option::of(0i64..1_000_000),
            "[a-z0-9]{0,6}",
            "[a-z ]{0,20}",
            prop::option::of(0u32..1000),
            prop::option::of(prop::collection::vec(arb_variant(), 0..4)),
        )
            .prop_map(
                |(name, cents, category, description, stock, variants)| ProductDraft {
                    name,
                    price: cents.map(|c| Decimal::new(c, 2)),
                    category,
                    description,
                    stock,
                    variants,
                },
            )
    }

    proptest! {
        #[test]
        fn prop_has_changes_is_reflexive(draft in arb_draft()) {
            prop_assert!(!has_changes(&draft, &draft.clone()));
        }

        #[test]
        fn prop_has_changes_is_symmetric(a in arb_draft(), b in arb_draft()) {
            prop_assert_eq!(has_changes(&a, &b), has_changes(&b, &a));
        }
    }
}
