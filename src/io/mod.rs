use anyhow::{Result, anyhow};
use async_trait::async_trait;
use image::{ImageFormat, ImageReader};
use serde::Serialize;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

pub mod inline;
pub mod local;

pub use inline::InlineMediaStorage;
pub use local::LocalMediaStorage;

pub const ALLOWED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

// where uploaded images end up; the returned url is what editors paste into content
#[async_trait]
pub trait MediaStorage: Send + Sync {
    async fn store(&self, image: &ImageUpload) -> Result<String>;
    async fn list(&self) -> Result<Vec<StoredMedia>>;
    /// Returns false when nothing by that name exists.
    async fn remove(&self, name: &str) -> Result<bool>;
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMedia {
    pub name: String,
    pub url: String,
    pub size: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("empty upload")]
    Empty,
    #[error("upload is {size} bytes, limit is {max}")]
    TooLarge { size: usize, max: usize },
    #[error("{0}")]
    NotAnImage(String),
}

/// Bytes that have been sniffed and header-checked as one of [`ALLOWED_FORMATS`].
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl ImageUpload {
    pub fn validate(bytes: Vec<u8>, max_bytes: usize) -> Result<Self, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if bytes.len() > max_bytes {
            return Err(UploadError::TooLarge {
                size: bytes.len(),
                max: max_bytes,
            });
        }

        let format = image::guess_format(&bytes)
            .map_err(|_| UploadError::NotAnImage("unrecognized image format".to_string()))?;
        if !ALLOWED_FORMATS.contains(&format) {
            return Err(UploadError::NotAnImage(format!(
                "{} images are not accepted",
                format.to_mime_type()
            )));
        }

        // read the header so truncated files with valid magic bytes are rejected
        let (width, height) = ImageReader::with_format(Cursor::new(&bytes), format)
            .into_dimensions()
            .map_err(|e| UploadError::NotAnImage(format!("unreadable image: {e}")))?;

        Ok(Self {
            bytes,
            format,
            width,
            height,
        })
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("bin")
    }
}

/// Joins a client-supplied file name onto `root`, refusing anything that could
/// leave it (separators, `..`, absolute paths).
pub fn verify_child_path(root: &Path, name: &str) -> Result<PathBuf> {
    let candidate = Path::new(name);
    let mut components = candidate.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(root.join(candidate)),
        _ => Err(anyhow!("Refusing path outside of upload root: {name}")),
    }
}
