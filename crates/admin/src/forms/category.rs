//! Add/edit category form.

use tracing::{info, instrument};

use senji_core::{Category, CategoryId, NewCategory};

use super::FormError;
use crate::api::ApiClient;
use crate::error::ConsoleError;

/// In-progress state of an add or edit category form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryForm {
    /// `Some` when editing.
    category_id: Option<CategoryId>,
    editing: bool,
    name: String,
    uses_sizes: bool,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryForm {
    /// Empty form for a new category; sizes are on by default.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            category_id: None,
            editing: false,
            name: String::new(),
            uses_sizes: true,
        }
    }

    /// Form pre-filled from an existing category.
    #[must_use]
    pub fn edit(category: &Category) -> Self {
        Self {
            category_id: Some(category.id.clone()).filter(|id| !id.as_str().trim().is_empty()),
            editing: true,
            name: category.name.clone(),
            uses_sizes: category.uses_sizes,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub const fn set_uses_sizes(&mut self, uses_sizes: bool) {
        self.uses_sizes = uses_sizes;
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn uses_sizes(&self) -> bool {
        self.uses_sizes
    }

    /// Validate and build the request body.
    ///
    /// # Errors
    ///
    /// Returns `FormError::MissingCategoryName` for a blank name.
    pub fn submission(&self) -> Result<NewCategory, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingCategoryName);
        }
        Ok(NewCategory::new(name).with_sizes(self.uses_sizes))
    }

    /// Create or update the category.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request, or the backend's
    /// error.
    #[instrument(skip(self, api), fields(name = %self.name))]
    pub async fn submit(&self, api: &ApiClient) -> Result<Category, ConsoleError> {
        let body = self.submission()?;
        let category = if self.editing {
            let id = self
                .category_id
                .as_ref()
                .ok_or(FormError::MissingCategoryId)?;
            api.update_category(id, &body).await?
        } else {
            api.create_category(&body).await?
        };
        info!(category_id = %category.id, "Category saved");
        Ok(category)
    }
}
