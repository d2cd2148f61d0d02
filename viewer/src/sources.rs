use std::path::{Path, PathBuf};

use thiserror::Error;

use warroom_shared::{parse_event_log, ReplayEvent};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed event log: {0}")]
    MalformedLog(#[from] serde_json::Error),
}

/// Where the ordered event log comes from. Fetched once per session; caching
/// is the source's concern.
pub trait EventLogSource {
    fn fetch_events(&self) -> impl Future<Output = Result<Vec<ReplayEvent>, SourceError>>;
}

/// Where the board template blob comes from. The blob still carries its
/// one-line header; the session strips it.
pub trait TemplateSource {
    fn fetch_template(&self) -> impl Future<Output = Result<String, SourceError>>;
}

/// Event log read from a JSON-lines file on disk.
#[derive(Debug, Clone)]
pub struct FileEventLogSource {
    path: PathBuf,
}

impl FileEventLogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EventLogSource for FileEventLogSource {
    async fn fetch_events(&self) -> Result<Vec<ReplayEvent>, SourceError> {
        let text = read_to_string(&self.path)?;
        Ok(parse_event_log(&text)?)
    }
}

/// Board template read from a file on disk.
#[derive(Debug, Clone)]
pub struct FileTemplateSource {
    path: PathBuf,
}

impl FileTemplateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TemplateSource for FileTemplateSource {
    async fn fetch_template(&self) -> Result<String, SourceError> {
        read_to_string(&self.path)
    }
}

fn read_to_string(path: &Path) -> Result<String, SourceError> {
    std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}
