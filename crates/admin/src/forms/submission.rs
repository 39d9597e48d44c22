//! Product create/update payloads.
//!
//! A submission is JSON unless an image accompanies it, in which case every
//! field is sent as multipart text and the variant list travels as a single
//! JSON-encoded `variants` field.

use reqwest::multipart::{Form, Part};
use serde::Serialize;

use senji_core::{CategoryId, Price, Variant};

use super::image::ImageUpload;
use crate::api::ApiError;
use crate::services::change_detector::{DraftError, ProductDraft};

/// Product fields as sent to the backend.
///
/// Exactly one of `variants` and `stock` is set, depending on whether the
/// category uses sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPayload {
    pub name: String,
    pub price: Price,
    pub category: CategoryId,
    /// Sent on create so the backend can label the product without a lookup.
    pub category_name: Option<String>,
    pub description: String,
    pub variants: Option<Vec<Variant>>,
    pub stock: Option<u32>,
}

/// JSON body; the category id goes out under both keys the backend reads.
#[derive(Serialize)]
struct JsonBody<'a> {
    name: &'a str,
    price: &'a Price,
    category: &'a CategoryId,
    category_id: &'a CategoryId,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_name: Option<&'a str>,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variants: Option<&'a [Variant]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stock: Option<u32>,
}

impl Serialize for ProductPayload {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        JsonBody {
            name: &self.name,
            price: &self.price,
            category: &self.category,
            category_id: &self.category,
            category_name: self.category_name.as_deref(),
            description: &self.description,
            variants: self.variants.as_deref(),
            stock: self.stock,
        }
        .serialize(serializer)
    }
}

impl ProductPayload {
    /// Flatten into multipart text fields.
    fn fields(&self) -> Result<Vec<(String, String)>, serde_json::Error> {
        let mut fields = vec![
            ("name".to_string(), self.name.clone()),
            ("price".to_string(), self.price.amount().to_string()),
            ("category".to_string(), self.category.to_string()),
            ("category_id".to_string(), self.category.to_string()),
            ("description".to_string(), self.description.clone()),
        ];
        if let Some(name) = &self.category_name {
            fields.push(("category_name".to_string(), name.clone()));
        }
        if let Some(variants) = &self.variants {
            fields.push(("variants".to_string(), serde_json::to_string(variants)?));
        }
        if let Some(stock) = self.stock {
            fields.push(("stock".to_string(), stock.to_string()));
        }
        Ok(fields)
    }
}

/// Multipart product submission: text fields plus the image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPayload {
    fields: Vec<(String, String)>,
    image: ImageUpload,
}

impl MultipartPayload {
    /// Encode a payload and image as multipart fields.
    ///
    /// # Errors
    ///
    /// Returns error if the variant list cannot be JSON-encoded.
    pub fn new(payload: &ProductPayload, image: ImageUpload) -> Result<Self, serde_json::Error> {
        Ok(Self {
            fields: payload.fields()?,
            image,
        })
    }

    /// Build from raw text fields, as received from another source.
    #[must_use]
    pub const fn from_fields(fields: Vec<(String, String)>, image: ImageUpload) -> Self {
        Self { fields, image }
    }

    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Value of the first field with the given name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub const fn image(&self) -> &ImageUpload {
        &self.image
    }

    /// Build the request body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` if the image content type is not a
    /// valid MIME type.
    pub fn to_form(&self) -> Result<Form, ApiError> {
        let image = Part::bytes(self.image.bytes().to_vec())
            .file_name(self.image.file_name().to_string())
            .mime_str(self.image.content_type())?;
        let form = self
            .fields
            .iter()
            .fold(Form::new(), |form, (key, value)| {
                form.text(key.clone(), value.clone())
            });
        Ok(form.part("image", image))
    }
}

/// A product create or update, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductSubmission {
    Json(ProductPayload),
    Multipart(MultipartPayload),
}

impl ProductSubmission {
    /// Choose the encoding: multipart when an image is attached.
    ///
    /// # Errors
    ///
    /// Returns error if the variant list cannot be JSON-encoded.
    pub fn build(
        payload: ProductPayload,
        image: Option<ImageUpload>,
    ) -> Result<Self, serde_json::Error> {
        match image {
            Some(image) => Ok(Self::Multipart(MultipartPayload::new(&payload, image)?)),
            None => Ok(Self::Json(payload)),
        }
    }

    /// Whether an image accompanies this submission.
    #[must_use]
    pub const fn has_image(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }

    /// Reduce to the fields the change detector compares.
    ///
    /// # Errors
    ///
    /// Returns `DraftError` if a multipart field does not parse.
    pub fn normalize(&self) -> Result<ProductDraft, DraftError> {
        match self {
            Self::Json(payload) => Ok(ProductDraft::from_payload(payload)),
            Self::Multipart(payload) => ProductDraft::from_fields(payload.fields()),
        }
    }
}
