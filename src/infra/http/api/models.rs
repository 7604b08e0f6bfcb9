use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::store::ContentParams;

/// Body of create and update requests. Absent fields default on create
/// and stay untouched on update.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ContentRequest {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub start_time: Option<OffsetDateTime>,
    pub end_time: Option<OffsetDateTime>,
    pub genres: Option<Vec<String>>,
}

impl From<ContentRequest> for ContentParams {
    fn from(request: ContentRequest) -> Self {
        Self {
            title: request.title,
            subtitle: request.subtitle,
            description: request.description,
            image_url: request.image_url,
            duration_seconds: request.duration_seconds,
            start_time: request.start_time,
            end_time: request.end_time,
            genres: request.genres,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub id: Uuid,
}
