pub mod board;
pub mod colors;
pub mod events;
pub mod tree;

pub use board::{BoardSnapshot, TerritoryId, TerritoryMap, TerritoryState, UNOCCUPIED};
pub use colors::{occupant_color, UPDATE_COLOR};
pub use events::{parse_event_log, ReplayEvent};
pub use tree::{ActionInfo, TreeSnapshot};
