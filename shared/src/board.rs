use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub type TerritoryId = String;
pub type TerritoryMap = HashMap<TerritoryId, TerritoryState>;

/// Occupant id marking a territory nobody holds yet.
pub const UNOCCUPIED: i32 = -1;

/// Per-territory occupancy as recorded by the log producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerritoryState {
    pub occupant_player_id: i32,
    pub troops: i32,
}

/// One full board state: the payload of a BOARD event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    #[serde(default)]
    pub territory_map: TerritoryMap,
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub round: u32,
}
