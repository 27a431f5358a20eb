use crate::database::ContentStore;
use crate::domain::{
    AboutContent, CollectionItem, Content, SiteSettings, ValidationError, normalize_collection,
    normalize_content,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{collection} item {id}")]
    NotFound { collection: &'static str, id: Uuid },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub type ContentResult<T> = Result<T, ContentError>;

/// Front door to the content store. Reads come from an in-memory snapshot,
/// writes are read-modify-write of the whole snapshot.
pub struct ContentService {
    store: Box<dyn ContentStore>,
    // the last snapshot loaded or saved; None until first use or after reload()
    cache: RwLock<Option<Arc<Content>>>,
    // one writer at a time inside this process
    write_lock: Mutex<()>,
}

impl ContentService {
    pub fn new(store: Box<dyn ContentStore>) -> Self {
        Self {
            store,
            cache: RwLock::new(None),
            write_lock: Mutex::new(()),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub async fn content(&self) -> Result<Arc<Content>> {
        if let Some(content) = self.cache.read().await.as_ref() {
            return Ok(content.clone());
        }

        let mut cache_guard = self.cache.write().await;
        // another task may have filled it while we waited for the write lock
        if let Some(content) = cache_guard.as_ref() {
            return Ok(content.clone());
        }

        let content = Arc::new(
            self.store
                .get_content()
                .await
                .context("Failed to load content")?,
        );
        tracing::info!(backend = self.backend_name(), "content cache loaded");
        *cache_guard = Some(content.clone());
        Ok(content)
    }

    /// Drops the cached snapshot so the next read goes to the store.
    pub async fn reload(&self) {
        *self.cache.write().await = None;
        tracing::info!("content cache cleared");
    }

    /// Replaces everything with `content`, after normalizing it.
    pub async fn replace(&self, mut content: Content) -> ContentResult<Arc<Content>> {
        normalize_content(&mut content)?;
        let _guard = self.write_lock.lock().await;
        self.commit(content).await
    }

    pub async fn settings(&self) -> Result<SiteSettings> {
        Ok(self.content().await?.settings.clone())
    }

    pub async fn update_settings(&self, settings: SiteSettings) -> ContentResult<SiteSettings> {
        self.mutate(|content| {
            content.settings = settings;
            normalize_content(content)?;
            Ok(content.settings.clone())
        })
        .await
    }

    pub async fn about(&self) -> Result<AboutContent> {
        Ok(self.content().await?.about.clone())
    }

    pub async fn update_about(&self, about: AboutContent) -> ContentResult<AboutContent> {
        self.mutate(|content| {
            content.about = about;
            normalize_content(content)?;
            Ok(content.about.clone())
        })
        .await
    }

    pub async fn list<T: CollectionItem>(&self) -> Result<Vec<T>> {
        Ok(T::items(&*self.content().await?).clone())
    }

    pub async fn get<T: CollectionItem>(&self, id: Uuid) -> ContentResult<T> {
        let content = self.content().await?;
        T::items(&content)
            .iter()
            .find(|item| item.id() == id)
            .cloned()
            .ok_or(ContentError::NotFound {
                collection: T::NAME,
                id,
            })
    }

    /// Appends `item`. A nil id is replaced with a fresh one.
    pub async fn create<T: CollectionItem>(&self, mut item: T) -> ContentResult<T> {
        if item.id().is_nil() {
            item.set_id(Uuid::new_v4());
        }
        let id = item.id();

        let created = self
            .mutate(|content| {
                let items = T::items_mut(content);
                items.push(item);
                normalize_collection(items)?;
                Ok(items.iter().find(|i| i.id() == id).cloned())
            })
            .await?;

        tracing::info!(collection = T::NAME, %id, "item created");
        created.ok_or(ContentError::NotFound {
            collection: T::NAME,
            id,
        })
    }

    /// Overwrites the item stored under `id`. The id in the body is ignored.
    pub async fn update<T: CollectionItem>(&self, id: Uuid, mut item: T) -> ContentResult<T> {
        item.set_id(id);

        let updated = self
            .mutate(|content| {
                let items = T::items_mut(content);
                let Some(slot) = items.iter_mut().find(|i| i.id() == id) else {
                    return Err(ContentError::NotFound {
                        collection: T::NAME,
                        id,
                    });
                };
                *slot = item;
                normalize_collection(items)?;
                Ok(items.iter().find(|i| i.id() == id).cloned())
            })
            .await?;

        tracing::info!(collection = T::NAME, %id, "item updated");
        updated.ok_or(ContentError::NotFound {
            collection: T::NAME,
            id,
        })
    }

    pub async fn delete<T: CollectionItem>(&self, id: Uuid) -> ContentResult<()> {
        self.mutate(|content| {
            let items = T::items_mut(content);
            let before = items.len();
            items.retain(|i| i.id() != id);
            if items.len() == before {
                return Err(ContentError::NotFound {
                    collection: T::NAME,
                    id,
                });
            }
            Ok(())
        })
        .await?;

        tracing::info!(collection = T::NAME, %id, "item deleted");
        Ok(())
    }

    // read the current snapshot, apply `f` to a copy, persist, swap the cache
    async fn mutate<R, F>(&self, f: F) -> ContentResult<R>
    where
        F: FnOnce(&mut Content) -> ContentResult<R>,
    {
        let _guard = self.write_lock.lock().await;
        let mut content = (*self.content().await?).clone();
        let result = f(&mut content)?;
        self.commit(content).await?;
        Ok(result)
    }

    // caller holds write_lock
    async fn commit(&self, content: Content) -> ContentResult<Arc<Content>> {
        self.store
            .save_content(&content)
            .await
            .context("Failed to save content")?;

        let content = Arc::new(content);
        *self.cache.write().await = Some(content.clone());
        Ok(content)
    }
}
