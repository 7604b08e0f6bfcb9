pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::infra::http::middleware::{log_responses, set_request_context};

pub fn build_api_router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/api/v1/contents",
            get(handlers::list_contents).post(handlers::create_content),
        )
        .route(
            "/api/v1/contents/{id}",
            get(handlers::get_content)
                .patch(handlers::update_content)
                .delete(handlers::delete_content),
        )
        .route(
            "/api/v1/contents/{id}/genres",
            post(handlers::add_genres).delete(handlers::remove_genres),
        )
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
