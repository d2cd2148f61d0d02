use std::path::PathBuf;

pub const SERVER_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_BOARDS_DIR: &str = "boards";
pub const DEFAULT_EVENT_LOG_FILE: &str = "event-logs.log";

pub fn server_port() -> u16 {
    std::env::var("WARROOM_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .filter(|port| *port > 0)
        .unwrap_or(SERVER_PORT)
}

pub fn static_dir() -> PathBuf {
    std::env::var("WARROOM_STATIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR))
}

pub fn boards_dir() -> PathBuf {
    std::env::var("WARROOM_BOARDS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_BOARDS_DIR))
}

pub fn event_log_file() -> PathBuf {
    std::env::var("WARROOM_EVENT_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_EVENT_LOG_FILE))
}
