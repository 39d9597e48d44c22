//! Product categories.

use serde::{Deserialize, Serialize};

use super::id::CategoryId;

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// Whether products in this category are stocked per size.
    pub uses_sizes: bool,
}

/// Payload for creating or editing a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default = "default_uses_sizes")]
    pub uses_sizes: bool,
}

impl NewCategory {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uses_sizes: true,
        }
    }

    #[must_use]
    pub const fn with_sizes(mut self, uses_sizes: bool) -> Self {
        self.uses_sizes = uses_sizes;
        self
    }
}

impl Default for NewCategory {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Categories created before the size flag existed all used sizes.
#[must_use]
pub const fn default_uses_sizes() -> bool {
    true
}

/// How a product points at its category.
///
/// Older backend records store the category's name instead of its id.
/// [`CategoryRef::resolve`] maps either form onto a loaded category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum CategoryRef {
    Id(CategoryId),
    Name(String),
}

impl CategoryRef {
    /// The raw identifier, whichever form it takes.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Id(id) => id.as_str(),
            Self::Name(name) => name,
        }
    }

    /// Find the referenced category.
    ///
    /// An id reference matches by id. A name reference matches by id first
    /// (backends sometimes put ids in the name slot) and then by exact name.
    #[must_use]
    pub fn resolve<'a>(&self, categories: &'a [Category]) -> Option<&'a Category> {
        match self {
            Self::Id(id) => categories.iter().find(|c| &c.id == id),
            Self::Name(name) => categories
                .iter()
                .find(|c| c.id.as_str() == name)
                .or_else(|| categories.iter().find(|c| &c.name == name)),
        }
    }

    /// Rewrite this reference as an id reference when it resolves.
    #[must_use]
    pub fn canonicalize(&self, categories: &[Category]) -> Self {
        self.resolve(categories)
            .map_or_else(|| self.clone(), |c| Self::Id(c.id.clone()))
    }
}

impl From<CategoryId> for CategoryRef {
    fn from(id: CategoryId) -> Self {
        Self::Id(id)
    }
}

impl std::fmt::Display for CategoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: CategoryId::new("c1"),
                name: "Shirts".to_string(),
                uses_sizes: true,
            },
            Category {
                id: CategoryId::new("c2"),
                name: "Mugs".to_string(),
                uses_sizes: false,
            },
        ]
    }

    #[test]
    fn test_resolve_by_id() {
        let cats = categories();
        let found = CategoryRef::Id(CategoryId::new("c2")).resolve(&cats);
        assert_eq!(found.map(|c| c.name.as_str()), Some("Mugs"));
    }

    #[test]
    fn test_resolve_by_name_then_canonicalize() {
        let cats = categories();
        let by_name = CategoryRef::Name("Shirts".to_string());
        assert_eq!(
            by_name.canonicalize(&cats),
            CategoryRef::Id(CategoryId::new("c1"))
        );
    }

    #[test]
    fn test_name_slot_holding_an_id() {
        let cats = categories();
        let found = CategoryRef::Name("c1".to_string()).resolve(&cats);
        assert_eq!(found.map(|c| c.name.as_str()), Some("Shirts"));
    }

    #[test]
    fn test_unresolved_reference_is_kept() {
        let unknown = CategoryRef::Name("Hats".to_string());
        assert_eq!(unknown.canonicalize(&categories()), unknown);
    }

    #[test]
    fn test_new_category_defaults_to_sizes() {
        assert!(NewCategory::new("Shirts").uses_sizes);
        let parsed: NewCategory = serde_json::from_str(r#"{"name":"Mugs"}"#).unwrap_or_default();
        assert!(parsed.uses_sizes);
    }
}
