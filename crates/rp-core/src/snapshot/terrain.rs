//! Terrain, monster, and object knowledge.
//!
//! All of this is written by the sensing collaborator and merely read by the
//! decision core, with one exception: the escalation ladder's final rung and
//! level transitions wipe it wholesale.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Pos { x, y }
    }

    /// Chebyshev distance, the movement metric of the host.
    pub fn distance(self, other: Pos) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn is_adjacent(self, other: Pos) -> bool {
        self != other && self.distance(other) <= 1
    }
}

/// Terrain features the pilot cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
pub enum Feature {
    #[default]
    Unknown,
    Floor,
    Wall,
    Rubble,
    DoorClosed,
    DoorOpen,
    StairsUp,
    StairsDown,
    ShopEntrance(u8),
}

/// A known monster, as last sensed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownMonster {
    pub pos: Pos,
    pub awake: bool,
    pub breeder: bool,
    /// Expected damage to the player per monster turn, supplied by sensing.
    pub expected_damage: i32,
    /// Expected damage of the player's best attack against it.
    pub kill_value: i32,
    pub last_seen: u32,
}

/// A known floor object worth walking to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownObject {
    pub pos: Pos,
    pub value: i64,
    pub last_seen: u32,
}

/// Serde adapter for `LevelMemory::features`: `Pos` keys are structs, which
/// JSON cannot express as map keys, so the map round-trips as a pair list.
mod features_as_pairs {
    use super::{Feature, Pos};
    use hashbrown::HashMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        map: &HashMap<Pos, Feature>,
        ser: S,
    ) -> Result<S::Ok, S::Error> {
        let pairs: Vec<(Pos, Feature)> = map.iter().map(|(&k, &v)| (k, v)).collect();
        pairs.serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<HashMap<Pos, Feature>, D::Error> {
        let pairs = Vec::<(Pos, Feature)>::deserialize(de)?;
        Ok(pairs.into_iter().collect())
    }
}

/// Everything the pilot remembers about the current level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMemory {
    /// JSON map keys must be strings, so this serializes as a pair list.
    #[serde(with = "features_as_pairs")]
    pub features: HashMap<Pos, Feature>,
    pub monsters: Vec<KnownMonster>,
    pub objects: Vec<KnownObject>,
    /// Tracked up-stair locations, nearest-first not guaranteed.
    pub stairs_up: Vec<Pos>,
    /// Tracked down-stair locations.
    pub stairs_down: Vec<Pos>,
    /// Count of unexplored frontier tiles sensing has reported.
    pub unexplored: u32,
}

impl LevelMemory {
    /// Forget everything. Used on level change and by the last escalation
    /// rung to break soft-lock loops.
    pub fn wipe(&mut self) {
        *self = LevelMemory::default();
    }

    /// Forget monsters and objects but keep terrain. The middle anti-bounce
    /// step uses this to stop the pilot chasing phantoms behind walls.
    pub fn forget_movables(&mut self) {
        self.monsters.clear();
        self.objects.clear();
    }

    pub fn feature_at(&self, pos: Pos) -> Feature {
        self.features.get(&pos).copied().unwrap_or(Feature::Unknown)
    }

    /// Distance from `from` to the nearest tracked stair in `stairs`.
    pub fn nearest_stair(stairs: &[Pos], from: Pos) -> Option<(Pos, i32)> {
        stairs
            .iter()
            .map(|&s| (s, from.distance(s)))
            .min_by_key(|&(_, d)| d)
    }

    /// Record a stair if it is not already tracked.
    pub fn track_stair(stairs: &mut Vec<Pos>, pos: Pos) {
        if !stairs.contains(&pos) {
            stairs.push(pos);
        }
    }
}
