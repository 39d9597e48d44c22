//! Product catalog endpoints.

use reqwest::Method;
use serde_json::Value;
use tracing::instrument;

use senji_core::{Product, ProductId};

use super::{ApiClient, ApiError, wire};
use crate::forms::ProductSubmission;

fn decode_product(value: Value) -> Result<Product, ApiError> {
    let record = wire::single(value, "product")
        .ok_or_else(|| ApiError::Decode("response carried no product".to_string()))?;
    wire::product(&record)
}

impl ApiClient {
    /// List every product in the catalog.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or a product cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let value: Value = self.get("/products", &[]).await?;
        wire::list(value, &["products", "data"])?
            .iter()
            .map(wire::product)
            .collect()
    }

    /// Get a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no such product exists.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let value: Value = self.get(&format!("/products/{id}"), &[]).await?;
        decode_product(value)
    }

    /// Create a product.
    ///
    /// Sent as multipart when the submission carries an image, JSON
    /// otherwise. Returns the backend's copy of the new product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if the backend rejects a field.
    #[instrument(skip(self, submission))]
    pub async fn create_product(&self, submission: &ProductSubmission) -> Result<Product, ApiError> {
        let value = self
            .submit_product(Method::POST, "/products", submission)
            .await?;
        decode_product(value)
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if the backend rejects a field, or
    /// `ApiError::NotFound` if the product no longer exists.
    #[instrument(skip(self, submission), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        submission: &ProductSubmission,
    ) -> Result<Product, ApiError> {
        let value = self
            .submit_product(Method::PUT, &format!("/products/{id}"), submission)
            .await?;
        decode_product(value)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), ApiError> {
        self.send_empty(Method::DELETE, &format!("/products/{id}"))
            .await
    }

    async fn submit_product(
        &self,
        method: Method,
        path: &str,
        submission: &ProductSubmission,
    ) -> Result<Value, ApiError> {
        match submission {
            ProductSubmission::Json(payload) => self.send_json(method, path, payload).await,
            ProductSubmission::Multipart(payload) => {
                let form = payload.to_form()?;
                self.send_multipart(method, path, form).await
            }
        }
    }
}
