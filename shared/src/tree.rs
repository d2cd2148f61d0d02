use serde::{Deserialize, Serialize};

/// One node of a search-tree snapshot: the payload of a TREE event.
///
/// Each event carries an entire fresh tree rooted at this node; ids and
/// levels are assigned by the viewer, not by the producer. `riskAction` is
/// the field name the bot's logger writes, accepted as an alias.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSnapshot {
    #[serde(default, alias = "riskAction")]
    pub action: Option<ActionInfo>,
    #[serde(default)]
    pub visits: u64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub ucb_value: f64,
    #[serde(default)]
    pub children: Vec<TreeSnapshot>,
}

/// The move a tree node represents. The producer serializes a number of
/// game-specific numeric fields alongside; only the display string matters
/// for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionInfo {
    pub action: String,
}
