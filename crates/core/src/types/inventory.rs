//! Stock tracking: sizes, variants and the per-product inventory.
//!
//! A product is stocked either per size (categories that use sizes) or as a
//! single flat count. [`Inventory`] makes that choice explicit so the two
//! can never both be authoritative.

use serde::{Deserialize, Serialize};

/// Error returned when a size label is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid size: {0} (expected S, M or L)")]
pub struct SizeParseError(pub String);

/// Garment size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Size {
    #[default]
    S,
    M,
    L,
}

impl Size {
    /// All sizes in display order.
    pub const ALL: [Self; 3] = [Self::S, Self::M, Self::L];

    /// Backend spelling of the size.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Size {
    type Err = SizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(Self::S),
            "M" => Ok(Self::M),
            "L" => Ok(Self::L),
            _ => Err(SizeParseError(s.to_owned())),
        }
    }
}

/// A (size, stock) pair under a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variant {
    pub size: Size,
    pub stock: u32,
}

impl Variant {
    #[must_use]
    pub const fn new(size: Size, stock: u32) -> Self {
        Self { size, stock }
    }
}

/// Result of adding stock for a size to a [`VariantList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantMerge {
    /// The size was new and was appended to the list.
    Added,
    /// The size already existed; its stock is now `total`.
    Merged {
        /// Size that absorbed the added stock.
        size: Size,
        /// Stock after the merge.
        total: u32,
    },
}

/// Ordered list of variants with at most one entry per size.
///
/// Order is insertion order and is significant: change detection compares
/// variants position by position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantList(Vec<Variant>);

impl VariantList {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a list from raw variants, merging repeated sizes into the first
    /// occurrence.
    #[must_use]
    pub fn from_variants(variants: impl IntoIterator<Item = Variant>) -> Self {
        let mut list = Self::new();
        for variant in variants {
            list.add(variant.size, variant.stock);
        }
        list
    }

    /// Add stock for a size.
    ///
    /// A size already present has `stock` added to its count (saturating);
    /// the list length does not change. Otherwise a new variant is appended.
    pub fn add(&mut self, size: Size, stock: u32) -> VariantMerge {
        if let Some(existing) = self.0.iter_mut().find(|v| v.size == size) {
            existing.stock = existing.stock.saturating_add(stock);
            return VariantMerge::Merged {
                size,
                total: existing.stock,
            };
        }
        self.0.push(Variant::new(size, stock));
        VariantMerge::Added
    }

    /// Remove the variant at `index`, returning it if the index was valid.
    pub fn remove(&mut self, index: usize) -> Option<Variant> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    /// Remove the variant for `size`, returning it if present.
    pub fn remove_size(&mut self, size: Size) -> Option<Variant> {
        let index = self.0.iter().position(|v| v.size == size)?;
        Some(self.0.remove(index))
    }

    /// Stock recorded for `size`, if that size is present.
    #[must_use]
    pub fn stock_for(&self, size: Size) -> Option<u32> {
        self.0.iter().find(|v| v.size == size).map(|v| v.stock)
    }

    /// Sum of stock across all sizes.
    #[must_use]
    pub fn total_stock(&self) -> u64 {
        self.0.iter().map(|v| u64::from(v.stock)).sum()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Variant] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variant> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<'a> IntoIterator for &'a VariantList {
    type Item = &'a Variant;
    type IntoIter = std::slice::Iter<'a, Variant>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// How a product's stock is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Inventory {
    /// Per-size stock (category uses sizes).
    Sized(VariantList),
    /// A single stock count (category does not use sizes).
    Flat(u32),
}

impl Default for Inventory {
    fn default() -> Self {
        Self::Sized(VariantList::new())
    }
}

impl Inventory {
    /// The variants, when stock is tracked per size.
    #[must_use]
    pub const fn variants(&self) -> Option<&VariantList> {
        match self {
            Self::Sized(list) => Some(list),
            Self::Flat(_) => None,
        }
    }

    /// The flat stock count, when stock is not tracked per size.
    #[must_use]
    pub const fn flat_stock(&self) -> Option<u32> {
        match self {
            Self::Sized(_) => None,
            Self::Flat(stock) => Some(*stock),
        }
    }

    /// Total units on hand regardless of tracking mode.
    #[must_use]
    pub fn total_stock(&self) -> u64 {
        match self {
            Self::Sized(list) => list.total_stock(),
            Self::Flat(stock) => u64::from(*stock),
        }
    }
}
