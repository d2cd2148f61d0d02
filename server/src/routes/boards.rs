use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::state::AppState;

const MAX_BOARD_NAME_LEN: usize = 128;

/// Serve a board file as JSON: the one-line header is discarded and the YAML
/// remainder converted, which is what map clients consume.
pub async fn get_board(State(state): State<AppState>, Path(filename): Path<String>) -> Response {
    if !is_safe_filename(&filename) {
        return (StatusCode::BAD_REQUEST, "invalid board name").into_response();
    }

    let path = state.boards_dir.join(&filename);
    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return (StatusCode::NOT_FOUND, "no such board").into_response();
        }
        Err(e) => {
            warn!(error = %e, board = %filename, "failed to read board file");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let body = raw.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
    let value = match serde_yaml::from_str::<serde_yaml::Value>(body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, board = %filename, "board file is not valid YAML");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    match serde_json::to_vec(&value) {
        Ok(json) => (
            [(header::CONTENT_TYPE, "application/json")],
            json,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, board = %filename, "board file does not convert to JSON");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_BOARD_NAME_LEN
        && !name.contains(['/', '\\'])
        && !name.contains("..")
}
