//! In-memory content store.
//!
//! Backs the service when no database URL is configured, and the test
//! suites. Interchangeable with the Postgres adapter behind the same
//! trait, cache included.

use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::store::{ContentParams, ContentStore, StoreError};
use crate::domain::entities::ContentRecord;

#[derive(Default)]
pub struct MemoryStore {
    records: DashMap<Uuid, ContentRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn create(&self, params: ContentParams) -> Result<ContentRecord, StoreError> {
        let now = OffsetDateTime::now_utc();
        let record = ContentRecord {
            id: Uuid::new_v4(),
            title: params.title.unwrap_or_default(),
            subtitle: params.subtitle.unwrap_or_default(),
            description: params.description.unwrap_or_default(),
            image_url: params.image_url.unwrap_or_default(),
            duration_seconds: params.duration_seconds.unwrap_or_default(),
            start_time: params.start_time,
            end_time: params.end_time,
            genres: params.genres.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn read(&self, id: Uuid) -> Result<Option<ContentRecord>, StoreError> {
        Ok(self.records.get(&id).map(|record| record.clone()))
    }

    async fn read_all(&self) -> Result<Vec<ContentRecord>, StoreError> {
        let mut records: Vec<ContentRecord> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(records)
    }

    async fn update(
        &self,
        id: Uuid,
        params: ContentParams,
    ) -> Result<Option<ContentRecord>, StoreError> {
        let Some(mut record) = self.records.get_mut(&id) else {
            return Ok(None);
        };
        params.apply_to(record.value_mut(), OffsetDateTime::now_utc());
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Uuid>, StoreError> {
        Ok(self.records.remove(&id).map(|(id, _)| id))
    }
}
