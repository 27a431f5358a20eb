use crate::io::{ALLOWED_FORMATS, ImageUpload, MediaStorage, StoredMedia, verify_child_path};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use walkdir::WalkDir;
use xxhash_rust::xxh3::xxh3_64;

pub const UPLOAD_URL_PREFIX: &str = "/uploads";

/// Writes uploads under `root_path`, named by the xxh3 hash of their bytes,
/// so uploading the same image twice yields the same url.
pub struct LocalMediaStorage {
    pub root_path: PathBuf,
}

impl LocalMediaStorage {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
        }
    }
}

fn is_image_name(name: &str) -> bool {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };
    let ext = ext.to_ascii_lowercase();
    ALLOWED_FORMATS
        .iter()
        .any(|f| f.extensions_str().contains(&ext.as_str()))
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    async fn store(&self, image: &ImageUpload) -> Result<String> {
        fs::create_dir_all(&self.root_path)
            .await
            .with_context(|| format!("Failed to create {}", self.root_path.display()))?;

        let name = format!("{:016x}.{}", xxh3_64(&image.bytes), image.extension());
        let path = verify_child_path(&self.root_path, &name)?;

        if fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(file = %name, "upload already stored");
        } else {
            fs::write(&path, &image.bytes)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(file = %name, bytes = image.bytes.len(), "upload stored");
        }

        Ok(format!("{UPLOAD_URL_PREFIX}/{name}"))
    }

    async fn list(&self) -> Result<Vec<StoredMedia>> {
        if !fs::try_exists(&self.root_path).await.unwrap_or(false) {
            return Ok(Vec::new());
        }

        let mut media = Vec::new();
        for entry in WalkDir::new(&self.root_path)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if !is_image_name(&name) {
                continue;
            }
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            media.push(StoredMedia {
                url: format!("{UPLOAD_URL_PREFIX}/{name}"),
                name,
                size,
            });
        }

        media.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(media)
    }

    async fn remove(&self, name: &str) -> Result<bool> {
        let path = verify_child_path(&self.root_path, name)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(file = %name, "upload removed");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}
