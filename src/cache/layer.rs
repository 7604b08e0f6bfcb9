//! Read-through cache wrapper around any content store.

use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use uuid::Uuid;

use crate::application::store::{ContentParams, ContentStore, StoreError};
use crate::domain::entities::ContentRecord;

use super::config::CacheConfig;
use super::store::TtlStore;

/// Wraps a backend store and serves reads from TTL-bounded cache
/// entries. Writes always go to the backend first; cache state changes
/// only after the backend confirms them.
pub struct CachedStore {
    inner: Arc<dyn ContentStore>,
    cache: TtlStore,
}

impl CachedStore {
    pub fn new(inner: Arc<dyn ContentStore>, config: CacheConfig) -> Self {
        Self {
            inner,
            cache: TtlStore::new(&config),
        }
    }
}

#[async_trait]
impl ContentStore for CachedStore {
    /// Delegates to the backend. The fresh record is not cached; it
    /// becomes visible to readers through the normal miss path.
    async fn create(&self, params: ContentParams) -> Result<ContentRecord, StoreError> {
        let created = self.inner.create(params).await?;
        self.cache.invalidate_collection();
        Ok(created)
    }

    async fn read(&self, id: Uuid) -> Result<Option<ContentRecord>, StoreError> {
        if let Some(record) = self.cache.get_record(id) {
            counter!("mediateca_cache_record_hit_total").increment(1);
            return Ok(Some(record));
        }
        counter!("mediateca_cache_record_miss_total").increment(1);

        // Snapshot the generation before the fetch so a write that lands
        // while we wait on the backend wins over our (now stale) result.
        let generation = self.cache.record_generation(id);
        let fetched = self.inner.read(id).await?;
        if let Some(record) = &fetched {
            self.cache.put_record_if_current(id, generation, record.clone());
        }
        // Not-found is never cached; every miss re-queries the backend.
        Ok(fetched)
    }

    async fn read_all(&self) -> Result<Vec<ContentRecord>, StoreError> {
        if let Some(items) = self.cache.get_collection() {
            counter!("mediateca_cache_collection_hit_total").increment(1);
            return Ok(items);
        }
        counter!("mediateca_cache_collection_miss_total").increment(1);

        let generation = self.cache.collection_generation();
        let items = self.inner.read_all().await?;
        self.cache.put_collection_if_current(generation, items.clone());
        Ok(items)
    }

    async fn update(
        &self,
        id: Uuid,
        params: ContentParams,
    ) -> Result<Option<ContentRecord>, StoreError> {
        let updated = self.inner.update(id, params).await?;
        if let Some(record) = &updated {
            self.cache.refresh_record(record.clone());
            self.cache.invalidate_collection();
        }
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Uuid>, StoreError> {
        let deleted = self.inner.delete(id).await?;
        if deleted.is_some() {
            self.cache.evict_record(id);
            self.cache.invalidate_collection();
        }
        Ok(deleted)
    }
}
