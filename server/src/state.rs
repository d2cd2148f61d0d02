use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use bytes::Bytes;
use tokio::sync::RwLock;

/// Event log parsed and pre-serialized once per file version, shared by all
/// requests until the file's modification time changes.
#[derive(Debug, Clone)]
pub struct CachedEventLog {
    pub modified: SystemTime,
    pub etag: String,
    pub json: Arc<Bytes>,
    pub total: usize,
    pub boards: usize,
    pub trees: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub boards_dir: PathBuf,
    pub event_log_file: PathBuf,
    pub event_log_cache: Arc<RwLock<Option<CachedEventLog>>>,
}

impl AppState {
    pub fn new(boards_dir: PathBuf, event_log_file: PathBuf) -> Self {
        Self {
            boards_dir,
            event_log_file,
            event_log_cache: Arc::new(RwLock::new(None)),
        }
    }
}
