//! Content service: the orchestration layer between the API boundary and
//! the (cached) store.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::application::store::{ContentParams, ContentStore, StoreError};
use crate::domain::entities::ContentRecord;
use crate::domain::genres;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ContentError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

#[derive(Clone)]
pub struct ContentService {
    store: Arc<dyn ContentStore>,
}

impl ContentService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<ContentRecord>, ContentError> {
        self.store.read_all().await.map_err(ContentError::from)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<ContentRecord>, ContentError> {
        self.store.read(id).await.map_err(ContentError::from)
    }

    pub async fn create(&self, params: ContentParams) -> Result<ContentRecord, ContentError> {
        validate_params(&params)?;
        let record = self.store.create(params).await?;
        debug!(target = "mediateca::contents", id = %record.id, "content created");
        Ok(record)
    }

    pub async fn update(
        &self,
        id: Uuid,
        params: ContentParams,
    ) -> Result<Option<ContentRecord>, ContentError> {
        validate_params(&params)?;
        Ok(self.store.update(id, params).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Option<Uuid>, ContentError> {
        let deleted = self.store.delete(id).await?;
        if deleted.is_some() {
            debug!(target = "mediateca::contents", id = %id, "content deleted");
        }
        Ok(deleted)
    }

    /// Add genres to an existing record, skipping case-insensitive
    /// duplicates. The new list is applied through the generic update
    /// path so the cache entry refreshes like any other write.
    pub async fn add_genres(
        &self,
        id: Uuid,
        additions: Vec<String>,
    ) -> Result<Option<ContentRecord>, ContentError> {
        validate_genre_request(&additions)?;
        let Some(existing) = self.store.read(id).await? else {
            return Ok(None);
        };
        let params = ContentParams {
            genres: Some(genres::merge(&existing.genres, &additions)),
            ..Default::default()
        };
        Ok(self.store.update(id, params).await?)
    }

    /// Remove every case-insensitive match of the given genres from an
    /// existing record.
    pub async fn remove_genres(
        &self,
        id: Uuid,
        removals: Vec<String>,
    ) -> Result<Option<ContentRecord>, ContentError> {
        validate_genre_request(&removals)?;
        let Some(existing) = self.store.read(id).await? else {
            return Ok(None);
        };
        let params = ContentParams {
            genres: Some(genres::strip(&existing.genres, &removals)),
            ..Default::default()
        };
        Ok(self.store.update(id, params).await?)
    }
}

fn validate_params(params: &ContentParams) -> Result<(), ContentError> {
    if let Some(duration) = params.duration_seconds {
        if duration < 0 {
            return Err(ContentError::validation("duration must not be negative"));
        }
    }
    if let (Some(start), Some(end)) = (params.start_time, params.end_time) {
        if end < start {
            return Err(ContentError::validation("end time precedes start time"));
        }
    }
    if let Some(genres) = &params.genres {
        ensure_no_blank_genres(genres)?;
    }
    Ok(())
}

fn validate_genre_request(genres: &[String]) -> Result<(), ContentError> {
    if genres.is_empty() {
        return Err(ContentError::validation("genre list must not be empty"));
    }
    ensure_no_blank_genres(genres)
}

fn ensure_no_blank_genres(genres: &[String]) -> Result<(), ContentError> {
    if genres.iter().any(|genre| genre.trim().is_empty()) {
        return Err(ContentError::validation("genre entries must not be blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::db::MemoryStore;

    fn service() -> ContentService {
        ContentService::new(Arc::new(MemoryStore::new()))
    }

    fn genre_list(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let service = service();
        let created = service
            .create(ContentParams {
                title: Some("Title 1".to_string()),
                genres: Some(genre_list(&["Genre 1", "Genre 2"])),
                ..Default::default()
            })
            .await
            .expect("create");

        let fetched = service.get(created.id).await.expect("get");
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn get_unknown_id_is_none() {
        let service = service();
        let fetched = service.get(Uuid::new_v4()).await.expect("get");
        assert_eq!(fetched, None);
    }

    #[tokio::test]
    async fn update_changes_only_present_fields() {
        let service = service();
        let created = service
            .create(ContentParams {
                title: Some("Original".to_string()),
                subtitle: Some("Subtitle".to_string()),
                duration_seconds: Some(120),
                ..Default::default()
            })
            .await
            .expect("create");

        let updated = service
            .update(
                created.id,
                ContentParams {
                    title: Some("Updated".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update")
            .expect("record exists");

        assert_eq!(updated.title, "Updated");
        assert_eq!(updated.subtitle, "Subtitle");
        assert_eq!(updated.duration_seconds, 120);
    }

    #[tokio::test]
    async fn delete_returns_id_then_none() {
        let service = service();
        let created = service.create(ContentParams::default()).await.expect("create");

        let deleted = service.delete(created.id).await.expect("delete");
        assert_eq!(deleted, Some(created.id));

        let again = service.delete(created.id).await.expect("delete again");
        assert_eq!(again, None);
    }

    #[tokio::test]
    async fn add_genres_appends_only_new_entries() {
        let service = service();
        let created = service
            .create(ContentParams {
                genres: Some(genre_list(&["Action", "Drama"])),
                ..Default::default()
            })
            .await
            .expect("create");

        let updated = service
            .add_genres(created.id, genre_list(&["action", "Comedy"]))
            .await
            .expect("add")
            .expect("record exists");

        assert_eq!(updated.genres, genre_list(&["Action", "Drama", "Comedy"]));
    }

    #[tokio::test]
    async fn remove_genres_matches_case_insensitively() {
        let service = service();
        let created = service
            .create(ContentParams {
                genres: Some(genre_list(&["Action", "Drama", "Comedy"])),
                ..Default::default()
            })
            .await
            .expect("create");

        let updated = service
            .remove_genres(created.id, genre_list(&["DRAMA"]))
            .await
            .expect("remove")
            .expect("record exists");

        assert_eq!(updated.genres, genre_list(&["Action", "Comedy"]));
    }

    #[tokio::test]
    async fn genre_mutation_on_unknown_id_is_none() {
        let service = service();
        let result = service
            .add_genres(Uuid::new_v4(), genre_list(&["Action"]))
            .await
            .expect("add");
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn empty_genre_list_is_rejected() {
        let service = service();
        let err = service
            .add_genres(Uuid::new_v4(), Vec::new())
            .await
            .expect_err("validation error");
        assert!(matches!(err, ContentError::Validation(_)));
    }

    #[tokio::test]
    async fn blank_genre_entry_is_rejected() {
        let service = service();
        let err = service
            .remove_genres(Uuid::new_v4(), genre_list(&["  "]))
            .await
            .expect_err("validation error");
        assert!(matches!(err, ContentError::Validation(_)));
    }

    #[tokio::test]
    async fn negative_duration_is_rejected() {
        let service = service();
        let err = service
            .create(ContentParams {
                duration_seconds: Some(-1),
                ..Default::default()
            })
            .await
            .expect_err("validation error");
        assert!(matches!(err, ContentError::Validation(_)));
    }

    #[tokio::test]
    async fn end_before_start_is_rejected() {
        use time::macros::datetime;

        let service = service();
        let err = service
            .create(ContentParams {
                start_time: Some(datetime!(2024-05-01 20:00 UTC)),
                end_time: Some(datetime!(2024-05-01 19:00 UTC)),
                ..Default::default()
            })
            .await
            .expect_err("validation error");
        assert!(matches!(err, ContentError::Validation(_)));
    }
}
