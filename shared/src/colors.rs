/// Color a changed territory flashes with for one frame.
pub const UPDATE_COLOR: (u8, u8, u8) = (0, 128, 0);

const PLAYER_ZERO: (u8, u8, u8) = (0, 0, 139);
const PLAYER_ONE: (u8, u8, u8) = (251, 36, 16);

/// Deterministic occupant color. The first two player ids keep reserved
/// palette entries; every other id derives a stable RGB triple from a fixed
/// multiplicative formula, so the same occupant renders identically within
/// and across sessions.
pub fn occupant_color(id: i32) -> (u8, u8, u8) {
    match id {
        0 => PLAYER_ZERO,
        1 => PLAYER_ONE,
        _ => derived_color(id),
    }
}

fn derived_color(id: i32) -> (u8, u8, u8) {
    let id = i64::from(id);
    (
        (id * 20).rem_euclid(255) as u8,
        (id * 33).rem_euclid(255) as u8,
        (id * 80).rem_euclid(255) as u8,
    )
}
