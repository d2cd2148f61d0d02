use std::collections::HashMap;

use thiserror::Error;

/// Characters the area flood-fill treats as impassable.
pub const BORDER_GLYPHS: [char; 7] = ['/', '\\', '-', '+', '|', '_', '`'];

/// Placeholder glyph emitted where a territory marker was removed.
pub const ANCHOR_GLYPH: char = 'X';

/// Rectangular character grid; rows may be ragged.
pub type Grid = Vec<Vec<char>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

/// A hand-authored post-parse correction forcing one cell to a border glyph,
/// fixing known artifacts of the whitespace run-length expansion.
#[derive(Debug, Clone, Copy)]
pub struct TemplatePatch {
    pub x: usize,
    pub y: usize,
    pub glyph: char,
}

/// Corrections for the default board template.
pub const DEFAULT_PATCHES: [TemplatePatch; 6] = [
    TemplatePatch { x: 80, y: 8, glyph: '+' },
    TemplatePatch { x: 123, y: 31, glyph: '+' },
    TemplatePatch { x: 208, y: 9, glyph: '+' },
    TemplatePatch { x: 36, y: 26, glyph: '+' },
    TemplatePatch { x: 38, y: 27, glyph: '+' },
    TemplatePatch { x: 50, y: 7, glyph: '_' },
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("territory marker opened on line {line} is never closed")]
    UnterminatedMarker { line: usize },
    #[error("'[' inside an open territory marker on line {line}")]
    NestedMarker { line: usize },
    #[error("']' without a matching '[' on line {line}")]
    UnmatchedClose { line: usize },
    #[error("empty territory marker on line {line}")]
    EmptyMarker { line: usize },
    #[error("duplicate territory id `{id}`")]
    DuplicateTerritory { id: String },
    #[error("patch target ({x}, {y}) is outside the grid")]
    PatchOutOfBounds { x: usize, y: usize },
}

/// The static spatial model parsed from a board template: the expanded
/// character grid and each territory's anchor coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct MapTemplate {
    pub grid: Grid,
    pub anchors: HashMap<String, Coord>,
}

pub fn is_border(glyph: char) -> bool {
    BORDER_GLYPHS.contains(&glyph)
}

/// Parse a raw board template into a grid and territory anchors.
///
/// Single scan with bracket-open state. Literal spaces carry no width;
/// whitespace runs are encoded as base-36 legend digits (`0`-`9`, `a`-`z`)
/// outside markers and expand to that many blanks. `[id]` markers accumulate
/// the territory id without emitting cells; the closing bracket records the
/// anchor at the current column and emits a single placeholder glyph.
/// Malformed markers and out-of-grid patch targets fail the whole parse.
pub fn parse_template(text: &str, patches: &[TemplatePatch]) -> Result<MapTemplate, ParseError> {
    let mut grid: Grid = vec![Vec::new()];
    let mut anchors = HashMap::new();
    let mut marker: Option<String> = None;
    let mut y = 0usize;

    for ch in text.chars() {
        match ch {
            '\n' => {
                if marker.is_some() {
                    return Err(ParseError::UnterminatedMarker { line: y + 1 });
                }
                grid.push(Vec::new());
                y += 1;
            }
            ' ' => {}
            '[' => {
                if marker.is_some() {
                    return Err(ParseError::NestedMarker { line: y + 1 });
                }
                marker = Some(String::new());
            }
            ']' => {
                let id = marker
                    .take()
                    .ok_or(ParseError::UnmatchedClose { line: y + 1 })?;
                if id.is_empty() {
                    return Err(ParseError::EmptyMarker { line: y + 1 });
                }
                let anchor = Coord {
                    x: grid[y].len(),
                    y,
                };
                if anchors.insert(id.clone(), anchor).is_some() {
                    return Err(ParseError::DuplicateTerritory { id });
                }
                grid[y].push(ANCHOR_GLYPH);
            }
            _ => {
                if let Some(id) = marker.as_mut() {
                    id.push(ch);
                } else if let Some(run) = legend_run_length(ch) {
                    let row = &mut grid[y];
                    let target = row.len() + run;
                    row.resize(target, ' ');
                } else {
                    grid[y].push(ch);
                }
            }
        }
    }
    if marker.is_some() {
        return Err(ParseError::UnterminatedMarker { line: y + 1 });
    }

    apply_patches(&mut grid, patches)?;
    Ok(MapTemplate { grid, anchors })
}

/// Base-36 whitespace run length: `0`-`9` map to 0-9, `a`-`z` to 10-35.
fn legend_run_length(ch: char) -> Option<usize> {
    match ch {
        '0'..='9' => Some(ch as usize - '0' as usize),
        'a'..='z' => Some(ch as usize - 'a' as usize + 10),
        _ => None,
    }
}

fn apply_patches(grid: &mut Grid, patches: &[TemplatePatch]) -> Result<(), ParseError> {
    for patch in patches {
        let cell = grid
            .get_mut(patch.y)
            .and_then(|row| row.get_mut(patch.x))
            .ok_or(ParseError::PatchOutOfBounds {
                x: patch.x,
                y: patch.y,
            })?;
        *cell = patch.glyph;
    }
    Ok(())
}
