//! Product image selection.

use std::path::Path;

use super::FormError;

/// Largest accepted image, in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// An image file chosen for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Accept an image from memory.
    ///
    /// # Errors
    ///
    /// Returns `FormError::InvalidImage` for a non-image content type and
    /// `FormError::ImageTooLarge` for files over [`MAX_IMAGE_BYTES`].
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, FormError> {
        let content_type = content_type.into();
        if !content_type.starts_with("image/") {
            return Err(FormError::InvalidImage);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(FormError::ImageTooLarge);
        }
        Ok(Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        })
    }

    /// Read an image from disk, inferring its content type from the
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns `FormError::ImageUnreadable` if the file cannot be read, or
    /// the validation errors of [`ImageUpload::new`].
    pub async fn from_path(path: &Path) -> Result<Self, FormError> {
        let unreadable = |e: std::io::Error| FormError::ImageUnreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        };
        let content_type = content_type_for(path).ok_or(FormError::InvalidImage)?;
        let size = tokio::fs::metadata(path).await.map_err(unreadable)?.len();
        if usize::try_from(size).ok().is_none_or(|size| size > MAX_IMAGE_BYTES) {
            return Err(FormError::ImageTooLarge);
        }
        let bytes = tokio::fs::read(path).await.map_err(unreadable)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
        Self::new(file_name, content_type, bytes)
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
