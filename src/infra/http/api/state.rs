use std::sync::Arc;

use crate::application::contents::ContentService;
use crate::infra::db::PostgresStore;

#[derive(Clone)]
pub struct ApiState {
    pub contents: Arc<ContentService>,
    /// Present only when the service runs against Postgres; the health
    /// endpoint reports ready unconditionally for the in-memory backend.
    pub db: Option<Arc<PostgresStore>>,
}
