use crate::config::OfammConfig;
use crate::db;
use crate::domain::Content;
use anyhow::{Context, Result};
use async_trait::async_trait;

pub mod json_file;
pub mod postgres;

pub use json_file::JsonFileContentStore;
pub use postgres::PostgresContentStore;

// a content store can be shared between threads (referencable)
// the whole site is one `Content` snapshot; backends read and overwrite it wholesale
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn get_content(&self) -> Result<Content>;

    // write operations, last write wins
    async fn save_content(&self, content: &Content) -> Result<()>;

    /// False until anything has been saved.
    async fn has_content(&self) -> Result<bool>;

    /// Short label for logs and `/health`.
    fn backend_name(&self) -> &'static str;
}

/// Picks the backend from `USE_DATABASE`. Postgres gets its schema created and,
/// on first boot, a copy of the JSON content file.
pub async fn open_store(config: &OfammConfig) -> Result<Box<dyn ContentStore>> {
    let json_store = JsonFileContentStore::new(&config.content_file);

    if !config.use_database {
        return Ok(Box::new(json_store));
    }

    // connect to our db and make sure the tables exist
    let pool = db::connect(config).await?;
    db::ensure_schema(&pool).await?;
    let pg_store = PostgresContentStore::new(pool);

    import_if_empty(&json_store, &pg_store).await?;
    Ok(Box::new(pg_store))
}

/// Copies `source` into `target` when `target` is still empty and `source`
/// has something to give. Returns whether a copy happened.
pub async fn import_if_empty(source: &dyn ContentStore, target: &dyn ContentStore) -> Result<bool> {
    if target.has_content().await? || !source.has_content().await? {
        return Ok(false);
    }

    let content = source.get_content().await?;
    target
        .save_content(&content)
        .await
        .with_context(|| {
            format!(
                "Failed to import {} content into {}",
                source.backend_name(),
                target.backend_name()
            )
        })?;
    tracing::info!(
        from = source.backend_name(),
        to = target.backend_name(),
        "imported content into empty store"
    );
    Ok(true)
}
