//! Router construction

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/config", get(routes::config::get))
        .route("/api/organizations", get(routes::config::organizations))
        .route("/api/levels", get(routes::config::levels))
        .route("/api/levels/progress", get(routes::levels::progress))
        .route("/api/points/calculate", post(routes::points::calculate))
        .route("/api/points/batch", post(routes::points::batch))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
