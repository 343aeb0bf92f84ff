//! Multipart request bodies for endpoints that accept an image upload.

use std::path::Path;

use reqwest::multipart::{Form, Part};

use super::http::HttpError;

/// Form field name the server reads uploaded images from.
pub const IMAGE_FIELD: &str = "images";

/// Uploaded images are always declared as JPEG.
pub const IMAGE_MIME: &str = "image/jpeg";

/// An image attached to a create/update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

impl ImageUpload {
    pub fn new(bytes: Vec<u8>, file_name: impl Into<String>) -> Self {
        Self {
            bytes,
            file_name: file_name.into(),
        }
    }

    /// Read an image from disk, naming it after the file.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image.jpg")
            .to_string();
        Ok(Self { bytes, file_name })
    }

    /// Same bytes under a different file name.
    pub fn renamed(self, file_name: impl Into<String>) -> Self {
        Self {
            bytes: self.bytes,
            file_name: file_name.into(),
        }
    }
}

/// Text fields plus an optional image, kept in insertion order.
///
/// Held in this plain form (rather than as a `reqwest` form) so it can be
/// inspected and cloned before sending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    fields: Vec<(String, String)>,
    image: Option<ImageUpload>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn image(mut self, image: Option<ImageUpload>) -> Self {
        self.image = image;
        self
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attached_image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    pub(crate) fn to_form(&self) -> Result<Form, HttpError> {
        let mut form = Form::new();
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        if let Some(ref image) = self.image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(IMAGE_MIME)
                .map_err(|e| HttpError::InvalidRequest(format!("Invalid image part: {}", e)))?;
            form = form.part(IMAGE_FIELD, part);
        }
        Ok(form)
    }
}
