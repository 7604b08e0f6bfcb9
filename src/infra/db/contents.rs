use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::store::{ContentParams, ContentStore, StoreError};
use crate::domain::entities::ContentRecord;

use super::{PostgresStore, map_sqlx_error};

const CONTENT_COLUMNS: &str = "id, title, subtitle, description, image_url, \
     duration_seconds, start_time, end_time, genres, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ContentRow {
    id: Uuid,
    title: String,
    subtitle: String,
    description: String,
    image_url: String,
    duration_seconds: i32,
    start_time: Option<OffsetDateTime>,
    end_time: Option<OffsetDateTime>,
    genres: Vec<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<ContentRow> for ContentRecord {
    fn from(row: ContentRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            subtitle: row.subtitle,
            description: row.description,
            image_url: row.image_url,
            duration_seconds: row.duration_seconds,
            start_time: row.start_time,
            end_time: row.end_time,
            genres: row.genres,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ContentStore for PostgresStore {
    async fn create(&self, params: ContentParams) -> Result<ContentRecord, StoreError> {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        let sql = format!(
            "INSERT INTO contents ({CONTENT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10) \
             RETURNING {CONTENT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(id)
            .bind(params.title.unwrap_or_default())
            .bind(params.subtitle.unwrap_or_default())
            .bind(params.description.unwrap_or_default())
            .bind(params.image_url.unwrap_or_default())
            .bind(params.duration_seconds.unwrap_or_default())
            .bind(params.start_time)
            .bind(params.end_time)
            .bind(params.genres.unwrap_or_default())
            .bind(now)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(ContentRecord::from(row))
    }

    async fn read(&self, id: Uuid) -> Result<Option<ContentRecord>, StoreError> {
        let sql = format!("SELECT {CONTENT_COLUMNS} FROM contents WHERE id = $1");

        let row = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(ContentRecord::from))
    }

    async fn read_all(&self) -> Result<Vec<ContentRecord>, StoreError> {
        let sql = format!(
            "SELECT {CONTENT_COLUMNS} FROM contents ORDER BY created_at, id"
        );

        let rows = sqlx::query_as::<_, ContentRow>(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ContentRecord::from).collect())
    }

    async fn update(
        &self,
        id: Uuid,
        params: ContentParams,
    ) -> Result<Option<ContentRecord>, StoreError> {
        let now = OffsetDateTime::now_utc();

        let sql = format!(
            "UPDATE contents \
             SET title = COALESCE($2, title), \
                 subtitle = COALESCE($3, subtitle), \
                 description = COALESCE($4, description), \
                 image_url = COALESCE($5, image_url), \
                 duration_seconds = COALESCE($6, duration_seconds), \
                 start_time = COALESCE($7, start_time), \
                 end_time = COALESCE($8, end_time), \
                 genres = COALESCE($9, genres), \
                 updated_at = $10 \
             WHERE id = $1 \
             RETURNING {CONTENT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(id)
            .bind(params.title)
            .bind(params.subtitle)
            .bind(params.description)
            .bind(params.image_url)
            .bind(params.duration_seconds)
            .bind(params.start_time)
            .bind(params.end_time)
            .bind(params.genres)
            .bind(now)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(ContentRecord::from))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Uuid>, StoreError> {
        let deleted = sqlx::query_scalar::<_, Uuid>(
            "DELETE FROM contents WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(deleted)
    }
}
