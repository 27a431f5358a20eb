use crate::io::{ImageUpload, MediaStorage, StoredMedia};
use anyhow::Result;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Embeds uploads straight into the content as `data:` urls. Nothing touches disk.
pub struct InlineMediaStorage;

#[async_trait]
impl MediaStorage for InlineMediaStorage {
    async fn store(&self, image: &ImageUpload) -> Result<String> {
        Ok(format!(
            "data:{};base64,{}",
            image.mime_type(),
            STANDARD.encode(&image.bytes)
        ))
    }

    async fn list(&self) -> Result<Vec<StoredMedia>> {
        Ok(Vec::new())
    }

    async fn remove(&self, _name: &str) -> Result<bool> {
        Ok(false)
    }
}
