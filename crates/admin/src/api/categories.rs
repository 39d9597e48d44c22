//! Category endpoints.

use reqwest::Method;
use serde_json::Value;
use tracing::instrument;

use senji_core::{Category, CategoryId, NewCategory};

use super::{ApiClient, ApiError, wire};

impl ApiClient {
    /// List all categories.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or a category cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let value: Value = self.get("/categories", &[]).await?;
        wire::list(value, &["categories", "data"])?
            .iter()
            .map(wire::category)
            .collect()
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if the backend rejects the name.
    #[instrument(skip(self))]
    pub async fn create_category(&self, category: &NewCategory) -> Result<Category, ApiError> {
        let value: Value = self
            .send_json(Method::POST, "/categories", category)
            .await?;
        let record = wire::single(value, "category")
            .ok_or_else(|| ApiError::Decode("response carried no category".to_string()))?;
        wire::category(&record)
    }

    /// Update a category's name and size flag.
    ///
    /// The backend takes updates as `POST /categories/:id` and does not
    /// always echo the record back; when it doesn't, the submitted fields
    /// are returned under the given id.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: &CategoryId,
        category: &NewCategory,
    ) -> Result<Category, ApiError> {
        let value: Value = self
            .send_json(Method::POST, &format!("/categories/{id}"), category)
            .await?;
        let echoed = wire::single(value, "category").and_then(|v| wire::category(&v).ok());
        Ok(echoed.unwrap_or_else(|| Category {
            id: id.clone(),
            name: category.name.clone(),
            uses_sizes: category.uses_sizes,
        }))
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: &CategoryId) -> Result<(), ApiError> {
        self.send_empty(Method::DELETE, &format!("/categories/{id}"))
            .await
    }
}
