pub mod api;
pub mod middleware;

pub use api::{ApiState, build_api_router};
