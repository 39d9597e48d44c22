//! Product and category forms.
//!
//! Forms hold the in-progress state of an add or edit, enforce the
//! client-side rules before any request is made, and turn the result into
//! a submission for the API client.

pub mod category;
pub mod image;
pub mod product;
pub mod submission;

use senji_core::Size;
use thiserror::Error;

pub use category::CategoryForm;
pub use image::{ImageUpload, MAX_IMAGE_BYTES};
pub use product::{EditOutcome, ProductForm};
pub use submission::{MultipartPayload, ProductPayload, ProductSubmission};

/// Client-side validation failures, worded for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please enter a product name")]
    MissingName,

    #[error("Please enter a valid price")]
    InvalidPrice,

    #[error("Please select a category")]
    MissingCategory,

    #[error("Please select a product image")]
    MissingImage,

    #[error("Please add at least one size variant for this category")]
    MissingVariants,

    #[error("Please enter a valid stock quantity")]
    InvalidStock,

    #[error("Cannot add size variants to this category. Please select a different category.")]
    SizesNotSupported,

    #[error("File size too large. Please select an image under 5MB.")]
    ImageTooLarge,

    #[error("Please select a valid image file (JPG, PNG, GIF).")]
    InvalidImage,

    #[error("Could not read image {path}: {reason}")]
    ImageUnreadable { path: String, reason: String },

    #[error("Product ID is missing!")]
    MissingProductId,

    #[error("Please enter a category name")]
    MissingCategoryName,

    #[error("Category ID is missing!")]
    MissingCategoryId,
}

/// Non-blocking notices raised while filling in a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormWarning {
    #[error("Size {0} already exists - stock will be added")]
    DuplicateSize(Size),
}

/// Parse a stock quantity typed into a form.
///
/// Blank, negative, fractional and non-numeric input is rejected.
pub(crate) fn parse_stock(input: &str) -> Result<u32, FormError> {
    input.trim().parse::<u32>().map_err(|_| FormError::InvalidStock)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stock() {
        assert_eq!(parse_stock(" 12 "), Ok(12));
        assert_eq!(parse_stock("0"), Ok(0));
        assert_eq!(parse_stock(""), Err(FormError::InvalidStock));
        assert_eq!(parse_stock("-3"), Err(FormError::InvalidStock));
        assert_eq!(parse_stock("2.5"), Err(FormError::InvalidStock));
    }

    #[test]
    fn test_duplicate_size_warning_text() {
        assert_eq!(
            FormWarning::DuplicateSize(Size::M).to_string(),
            "Size M already exists - stock will be added"
        );
    }
}
