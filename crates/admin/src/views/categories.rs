//! Category list view.

use tracing::instrument;

use senji_core::{Category, CategoryId};

use crate::api::ApiClient;
use crate::error::ConsoleError;

/// Cached category list.
#[derive(Debug, Clone, Default)]
pub struct CategoryList {
    categories: Vec<Category>,
}

impl CategoryList {
    #[must_use]
    pub const fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Fetch the category list.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(api))]
    pub async fn load(api: &ApiClient) -> Result<Self, ConsoleError> {
        Ok(Self::new(api.list_categories().await?))
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn find(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    /// Find by id, then by case-insensitive name.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.id.as_str() == key)
            .or_else(|| {
                self.categories
                    .iter()
                    .find(|c| c.name.eq_ignore_ascii_case(key.trim()))
            })
    }

    /// Add a newly created category.
    pub fn insert(&mut self, category: Category) {
        self.categories.push(category);
    }

    /// Replace the cached copy of an updated category, or add it.
    pub fn upsert(&mut self, category: Category) {
        match self.categories.iter_mut().find(|c| c.id == category.id) {
            Some(slot) => *slot = category,
            None => self.categories.push(category),
        }
    }

    /// Drop a deleted category.
    pub fn remove(&mut self, id: &CategoryId) -> Option<Category> {
        let index = self.categories.iter().position(|c| &c.id == id)?;
        Some(self.categories.remove(index))
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Category> {
        self.categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: CategoryId::new(id),
            name: name.to_string(),
            uses_sizes: true,
        }
    }

    #[test]
    fn test_lookup_by_id_then_name() {
        let list = CategoryList::new(vec![category("c1", "Shirts"), category("c2", "Mugs")]);
        assert_eq!(list.lookup("c2").map(|c| c.name.as_str()), Some("Mugs"));
        assert_eq!(list.lookup("shirts").map(|c| c.id.as_str()), Some("c1"));
        assert!(list.lookup("hats").is_none());
    }

    #[test]
    fn test_upsert_and_remove() {
        let mut list = CategoryList::new(vec![category("c1", "Shirts")]);
        list.upsert(category("c1", "Tees"));
        assert_eq!(list.categories().len(), 1);
        assert_eq!(list.find(&CategoryId::new("c1")).map(|c| c.name.as_str()), Some("Tees"));

        list.upsert(category("c2", "Mugs"));
        assert_eq!(list.categories().len(), 2);

        assert!(list.remove(&CategoryId::new("c1")).is_some());
        assert!(list.remove(&CategoryId::new("c1")).is_none());
    }
}
