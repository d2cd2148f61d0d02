use std::io::ErrorKind;
use std::sync::Arc;
use std::time::SystemTime;

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use warroom_shared::ReplayEvent;

use crate::state::{AppState, CachedEventLog};

/// Serve the whole event log as one JSON array.
///
/// The parsed payload is cached by file modification time and pre-serialized
/// once; clients revalidate with `If-None-Match` against the content ETag.
pub async fn get_event_logs(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let metadata = tokio::fs::metadata(&state.event_log_file).await;
    let modified = match metadata.and_then(|meta| meta.modified()) {
        Ok(modified) => modified,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return (StatusCode::NOT_FOUND, "no event log recorded").into_response();
        }
        Err(e) => {
            warn!(error = %e, "failed to stat event log");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let cached = state.event_log_cache.read().await.clone();
    let entry = match cached {
        Some(entry) if entry.modified == modified => entry,
        _ => match refresh_cache(&state, modified).await {
            Ok(entry) => entry,
            Err(response) => return response,
        },
    };

    if if_none_match_matches(&headers, &entry.etag) {
        return not_modified_response(&entry);
    }
    event_log_response(&entry)
}

async fn refresh_cache(
    state: &AppState,
    modified: SystemTime,
) -> Result<CachedEventLog, Response> {
    let raw = match tokio::fs::read_to_string(&state.event_log_file).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "failed to read event log");
            return Err(StatusCode::INTERNAL_SERVER_ERROR.into_response());
        }
    };

    let mut values: Vec<serde_json::Value> = Vec::new();
    let mut boards = 0usize;
    let mut trees = 0usize;
    for (number, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: serde_json::Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                warn!(line = number + 1, error = %e, "event log line is not valid JSON");
                return Err(
                    (StatusCode::INTERNAL_SERVER_ERROR, "malformed event log").into_response()
                );
            }
        };
        // Validate against the event envelope; unknown tags are legal.
        match serde_json::from_value::<ReplayEvent>(value.clone()) {
            Ok(ReplayEvent::Board(_)) => boards += 1,
            Ok(ReplayEvent::Tree(_)) => trees += 1,
            Ok(ReplayEvent::Unknown) => {}
            Err(e) => {
                warn!(line = number + 1, error = %e, "event log line does not match the event envelope");
                return Err(
                    (StatusCode::INTERNAL_SERVER_ERROR, "malformed event log").into_response()
                );
            }
        }
        values.push(value);
    }

    let json = match serde_json::to_vec(&values) {
        Ok(json) => Bytes::from(json),
        Err(e) => {
            warn!(error = %e, "failed to serialize event log payload");
            return Err(StatusCode::INTERNAL_SERVER_ERROR.into_response());
        }
    };
    let entry = CachedEventLog {
        modified,
        etag: event_log_etag(&json),
        json: Arc::new(json),
        total: values.len(),
        boards,
        trees,
    };
    info!(
        total = entry.total,
        boards = entry.boards,
        trees = entry.trees,
        "event log cache refreshed"
    );
    *state.event_log_cache.write().await = Some(entry.clone());
    Ok(entry)
}

fn event_log_etag(json: &Bytes) -> String {
    format!("\"log-{:08x}\"", crc32fast::hash(json))
}

fn if_none_match_matches(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == etag || value == "*")
}

fn event_log_response(entry: &CachedEventLog) -> Response {
    let mut response = (StatusCode::OK, (*entry.json).clone()).into_response();
    apply_cache_headers(&mut response, entry);
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn not_modified_response(entry: &CachedEventLog) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    apply_cache_headers(&mut response, entry);
    response
}

fn apply_cache_headers(response: &mut Response, entry: &CachedEventLog) {
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    if let Ok(value) = HeaderValue::from_str(&entry.etag) {
        headers.insert(header::ETAG, value);
    }
    if let Ok(value) = HeaderValue::from_str(&http_date(entry.modified)) {
        headers.insert(header::LAST_MODIFIED, value);
    }
}

fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
