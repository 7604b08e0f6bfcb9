//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// A catalog entry: a scheduled piece of media content.
///
/// The identifier is assigned at creation and never changes. The genre
/// list is ordered; membership is matched case-insensitively but the
/// original casing is stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRecord {
    pub id: Uuid,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub image_url: String,
    pub duration_seconds: i32,
    pub start_time: Option<OffsetDateTime>,
    pub end_time: Option<OffsetDateTime>,
    pub genres: Vec<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
