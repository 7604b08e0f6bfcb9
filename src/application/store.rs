//! Storage contract for content records.
//!
//! Any backend implementing [`ContentStore`] can sit behind the cache:
//! the Postgres adapter in production, the in-memory adapter in tests
//! and URL-less deployments.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::ContentRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl StoreError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Partial content payload shared by create and update.
///
/// On create an absent field takes its default; on update it means
/// "do not change".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentParams {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub start_time: Option<OffsetDateTime>,
    pub end_time: Option<OffsetDateTime>,
    pub genres: Option<Vec<String>>,
}

impl ContentParams {
    /// Overlay the present fields onto an existing record and bump its
    /// update timestamp. Mirrors the COALESCE semantics of the SQL
    /// update path.
    pub fn apply_to(&self, record: &mut ContentRecord, now: OffsetDateTime) {
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(subtitle) = &self.subtitle {
            record.subtitle = subtitle.clone();
        }
        if let Some(description) = &self.description {
            record.description = description.clone();
        }
        if let Some(image_url) = &self.image_url {
            record.image_url = image_url.clone();
        }
        if let Some(duration) = self.duration_seconds {
            record.duration_seconds = duration;
        }
        if let Some(start_time) = self.start_time {
            record.start_time = Some(start_time);
        }
        if let Some(end_time) = self.end_time {
            record.end_time = Some(end_time);
        }
        if let Some(genres) = &self.genres {
            record.genres = genres.clone();
        }
        record.updated_at = now;
    }
}

/// Exact CRUD over content records.
///
/// A missing record is a normal outcome and comes back as `None`;
/// `StoreError` is reserved for the store itself failing.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Assign a fresh identifier, persist a new record, return it.
    async fn create(&self, params: ContentParams) -> Result<ContentRecord, StoreError>;

    /// Exact lookup by identifier.
    async fn read(&self, id: Uuid) -> Result<Option<ContentRecord>, StoreError>;

    /// Every live record, ordered by creation time then identifier.
    async fn read_all(&self) -> Result<Vec<ContentRecord>, StoreError>;

    /// Apply the present fields onto the stored record and return the
    /// full updated row.
    async fn update(
        &self,
        id: Uuid,
        params: ContentParams,
    ) -> Result<Option<ContentRecord>, StoreError>;

    /// Remove the record, returning its identifier when it existed.
    async fn delete(&self, id: Uuid) -> Result<Option<Uuid>, StoreError>;
}
