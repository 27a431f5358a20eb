pub mod collection;
pub mod content;

pub use collection::{CollectionItem, COLLECTION_NAMES, normalize_collection, normalize_content};
pub use content::{
    AboutContent, BlogPost, Content, Event, GalleryImage, Partner, Product, Service, SiteSettings,
    Slide, format_price, slugify,
};

use thiserror::Error;

/// Rejected input, reported back to the editor as a 422.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
