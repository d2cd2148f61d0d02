use serde::{Deserialize, Serialize};

use crate::board::BoardSnapshot;
use crate::tree::TreeSnapshot;

/// One record of the replay log.
///
/// The wire format is adjacently tagged JSON, `{"type": "BOARD", "data":
/// {...}}`, one record per line. Records with an unrecognized tag
/// deserialize to [`ReplayEvent::Unknown`]; dispatch skips them without a
/// rendering side effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ReplayEvent {
    #[serde(rename = "BOARD")]
    Board(BoardSnapshot),
    #[serde(rename = "TREE")]
    Tree(TreeSnapshot),
    #[serde(other, rename = "UNKNOWN")]
    Unknown,
}

impl ReplayEvent {
    pub fn is_board(&self) -> bool {
        matches!(self, ReplayEvent::Board(_))
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, ReplayEvent::Tree(_))
    }
}

/// Parse a JSON-lines event log into ordered records. Empty lines, including
/// the conventional trailing newline, are skipped.
pub fn parse_event_log(text: &str) -> Result<Vec<ReplayEvent>, serde_json::Error> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(serde_json::from_str)
        .collect()
}
