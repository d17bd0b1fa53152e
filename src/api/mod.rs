pub mod dtos;
pub mod handlers;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::{app_state::AppState, health::health_check};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/v1/crawl", post(handlers::crawl))
        .route("/v1/pages", get(handlers::list_pages))
        .route("/v1/pages/{id}", put(handlers::move_page))
        .route("/v1/export", post(handlers::export))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
