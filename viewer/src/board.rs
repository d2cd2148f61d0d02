use std::cmp::Ordering;

use warroom_shared::{
    occupant_color, BoardSnapshot, TerritoryId, TerritoryMap, TerritoryState, UNOCCUPIED,
    UPDATE_COLOR,
};

use crate::area::AreaMap;
use crate::template::{Coord, Grid, MapTemplate};

/// One cell of a rendered frame: a template glyph drawn as text, or a cell
/// filled with an occupant color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameCell {
    Glyph(char),
    Fill((u8, u8, u8)),
}

/// Render instructions for one BOARD event, consumable by any drawing
/// surface.
#[derive(Debug, Clone)]
pub struct BoardFrame {
    pub round: u32,
    pub rows: Vec<Vec<FrameCell>>,
    /// Territories whose occupancy differs from the previous frame.
    pub changed: Vec<TerritoryId>,
}

impl BoardFrame {
    /// Plain-text projection of the frame; filled cells render as `█`.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            for cell in row {
                out.push(match cell {
                    FrameCell::Glyph(glyph) => *glyph,
                    FrameCell::Fill(_) => '█',
                });
            }
            out.push('\n');
        }
        out
    }
}

/// Turns BOARD snapshots into paintable frames against the static spatial
/// model, diffing each snapshot against the previous one.
pub struct BoardRenderer {
    template: MapTemplate,
    areas: AreaMap,
    previous: Option<BoardSnapshot>,
}

impl BoardRenderer {
    pub fn new(template: MapTemplate, areas: AreaMap) -> Self {
        Self {
            template,
            areas,
            previous: None,
        }
    }

    /// Render one snapshot and remember it for the next diff.
    pub fn render(&mut self, snapshot: &BoardSnapshot) -> BoardFrame {
        let changed = match &self.previous {
            None => Vec::new(),
            Some(previous) => {
                changed_territories(&previous.territory_map, &snapshot.territory_map)
            }
        };

        let mut grid = self.template.grid.clone();
        let ids = ordered_ids(&snapshot.territory_map);
        for id in &ids {
            let state = &snapshot.territory_map[*id];
            if state.occupant_player_id == UNOCCUPIED {
                continue;
            }
            if let Some(&anchor) = self.template.anchors.get(*id) {
                overlay_info_string(&mut grid, anchor, id, state);
            }
        }

        let mut rows: Vec<Vec<FrameCell>> = grid
            .iter()
            .map(|row| row.iter().map(|&glyph| FrameCell::Glyph(glyph)).collect())
            .collect();
        for id in &ids {
            let state = &snapshot.territory_map[*id];
            if state.occupant_player_id == UNOCCUPIED {
                continue;
            }
            let Some(area) = self.areas.get(*id) else {
                continue;
            };
            let color = if changed.contains(id) {
                UPDATE_COLOR
            } else {
                occupant_color(state.occupant_player_id)
            };
            for cell in area {
                // Info strings take precedence over area coloring.
                if grid[cell.y][cell.x] == ' ' {
                    rows[cell.y][cell.x] = FrameCell::Fill(color);
                }
            }
        }

        self.previous = Some(snapshot.clone());
        BoardFrame {
            round: snapshot.round,
            rows,
            changed,
        }
    }
}

/// Territories whose occupancy differs between two snapshots, sorted.
/// Territories absent from the previous snapshot count as changed.
pub fn changed_territories(previous: &TerritoryMap, current: &TerritoryMap) -> Vec<TerritoryId> {
    let mut changed: Vec<TerritoryId> = current
        .iter()
        .filter(|&(id, state)| previous.get(id) != Some(state))
        .map(|(id, _)| id.clone())
        .collect();
    changed.sort();
    changed
}

/// Numeric ids ascending, then the rest lexicographically. Overlay and paint
/// order must be deterministic because earlier info strings shrink the blank
/// runs available to later ones.
fn ordered_ids(map: &TerritoryMap) -> Vec<&TerritoryId> {
    let mut ids: Vec<&TerritoryId> = map.keys().collect();
    ids.sort_by(|a, b| match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(left), Ok(right)) => left.cmp(&right),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    });
    ids
}

/// Write `"<id>[<occupant>:<troops>]"` centered on the anchor, growing the
/// window one blank cell at a time (left side first) and never claiming a
/// non-blank cell. A window that stops growing truncates the string.
fn overlay_info_string(grid: &mut Grid, anchor: Coord, id: &str, state: &TerritoryState) {
    let info: Vec<char> = format!("{id}[{}:{}]", state.occupant_player_id, state.troops)
        .chars()
        .collect();
    let row = &mut grid[anchor.y];
    let mut first = anchor.x;
    let mut last = anchor.x;
    let mut window = 1usize;
    while window < info.len() {
        let before = window;
        if first > 0 && row[first - 1] == ' ' {
            first -= 1;
            window += 1;
        }
        if window < info.len() && last + 1 < row.len() && row[last + 1] == ' ' {
            last += 1;
            window += 1;
        }
        if window == before {
            break;
        }
    }
    for (offset, &glyph) in info.iter().take(window).enumerate() {
        row[first + offset] = glyph;
    }
}
