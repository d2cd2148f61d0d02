use std::path::PathBuf;

use axum::routing::get;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;

use crate::routes;
use crate::state::AppState;

pub(crate) fn build_app(state: AppState, static_dir: PathBuf) -> Router {
    Router::new()
        .route("/boards/{filename}", get(routes::boards::get_board))
        .route("/event-logs", get(routes::events::get_event_logs))
        .route("/api/health", get(routes::api::health))
        .layer(CompressionLayer::new())
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
}
