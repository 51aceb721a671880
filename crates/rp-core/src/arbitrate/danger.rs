//! Positional danger estimate.
//!
//! Sensing supplies a per-monster expected damage; this module only folds
//! those numbers over distance. Sleeping monsters count for nothing until
//! the pilot would step next to them.

use crate::snapshot::terrain::Pos;
use crate::snapshot::WorldSnapshot;

/// Monsters further than this contribute nothing.
const DANGER_RANGE: i32 = 4;

/// Expected damage per turn the player would face standing at `pos`.
pub fn danger_at(snap: &WorldSnapshot, pos: Pos) -> i32 {
    let mut total = 0i32;
    for m in &snap.level.monsters {
        let dist = pos.distance(m.pos);
        if dist > DANGER_RANGE {
            continue;
        }
        if !m.awake && dist > 1 {
            continue;
        }
        // Adjacent monsters hit now; the rest need turns to close.
        let scaled = if dist <= 1 {
            m.expected_damage
        } else {
            m.expected_damage / dist
        };
        // Breeders multiply while ignored.
        total += if m.breeder { scaled * 2 } else { scaled };
    }
    total
}

/// Danger on the tile the player occupies.
pub fn danger_here(snap: &WorldSnapshot) -> i32 {
    danger_at(snap, snap.pos)
}
