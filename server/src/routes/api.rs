use axum::extract::State;
use axum::Json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let cache = state.event_log_cache.read().await;
    let (total, boards, trees) = cache
        .as_ref()
        .map(|entry| (entry.total, entry.boards, entry.trees))
        .unwrap_or_default();
    Json(serde_json::json!({
        "status": "ok",
        "events": total,
        "board_events": boards,
        "tree_events": trees,
    }))
}
