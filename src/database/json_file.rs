use crate::database::ContentStore;
use crate::domain::Content;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

/// Keeps the whole site in one pretty-printed JSON document.
pub struct JsonFileContentStore {
    path: PathBuf,
    // serializes writers so two saves never share a temp file
    write_lock: Mutex<()>,
}

impl JsonFileContentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "content.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ContentStore for JsonFileContentStore {
    async fn get_content(&self) -> Result<Content> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(
                    path = %self.path.display(),
                    "content file not found, serving default content"
                );
                return Ok(Content::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };

        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse content file {}", self.path.display()))
    }

    async fn save_content(&self, content: &Content) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(content).context("Failed to serialize content")?;

        // write beside the target and rename over it, readers never see half a file
        let temp = self.temp_path();
        fs::write(&temp, json)
            .await
            .with_context(|| format!("Failed to write {}", temp.display()))?;
        fs::rename(&temp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), "content file saved");
        Ok(())
    }

    async fn has_content(&self) -> Result<bool> {
        Ok(self.exists().await)
    }

    fn backend_name(&self) -> &'static str {
        "json"
    }
}
