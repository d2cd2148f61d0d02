use std::collections::{HashMap, HashSet};

use crate::template::{is_border, Coord, Grid, MapTemplate};

/// Hard cap on cells a single territory may claim; bounds the traversal on
/// malformed maps with leaky borders.
pub const AREA_CELL_BUDGET: usize = 120;

pub type AreaMap = HashMap<String, Vec<Coord>>;

/// Compute every territory's owned cell set by flood-filling from its anchor.
/// Each territory gets an independent seen-set and budget.
pub fn resolve_areas(template: &MapTemplate) -> AreaMap {
    template
        .anchors
        .iter()
        .map(|(id, &anchor)| {
            (
                id.clone(),
                expand_area(&template.grid, anchor, AREA_CELL_BUDGET),
            )
        })
        .collect()
}

/// Depth-first flood-fill from `anchor`, claiming at most `budget` cells.
///
/// Cells outside the grid (including short ragged rows) and border glyphs are
/// impassable. Neighbors are visited right, down, left, up; the work stack
/// pushes them in reverse so the claim order matches the recursive
/// formulation, which matters when the budget runs out near a boundary.
pub fn expand_area(grid: &Grid, anchor: Coord, budget: usize) -> Vec<Coord> {
    let mut area = Vec::new();
    let mut seen: HashSet<Coord> = HashSet::new();
    let mut stack = vec![anchor];

    while let Some(coord) = stack.pop() {
        if area.len() == budget {
            break;
        }
        let Some(&glyph) = grid.get(coord.y).and_then(|row| row.get(coord.x)) else {
            continue;
        };
        if is_border(glyph) || !seen.insert(coord) {
            continue;
        }
        area.push(coord);

        if coord.y > 0 {
            stack.push(Coord {
                x: coord.x,
                y: coord.y - 1,
            });
        }
        if coord.x > 0 {
            stack.push(Coord {
                x: coord.x - 1,
                y: coord.y,
            });
        }
        stack.push(Coord {
            x: coord.x,
            y: coord.y + 1,
        });
        stack.push(Coord {
            x: coord.x + 1,
            y: coord.y,
        });
    }

    area
}
