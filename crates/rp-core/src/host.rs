//! Boundary traits toward the host game.
//!
//! The core drives the host exclusively through single discrete actions and
//! consumes pathing as a black box. Sensing happens outside: the host
//! refreshes the snapshot between turns.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::snapshot::terrain::Pos;
use crate::snapshot::WorldSnapshot;

/// Eight movement directions plus "stay".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
    Here,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, -1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (-1, 1),
            Direction::Here => (0, 0),
        }
    }

    /// The direction that steps from `from` toward `to`, one tile.
    pub fn toward(from: Pos, to: Pos) -> Direction {
        let dx = (to.x - from.x).signum();
        let dy = (to.y - from.y).signum();
        match (dx, dy) {
            (0, -1) => Direction::North,
            (0, 1) => Direction::South,
            (1, 0) => Direction::East,
            (-1, 0) => Direction::West,
            (1, -1) => Direction::NorthEast,
            (-1, -1) => Direction::NorthWest,
            (1, 1) => Direction::SouthEast,
            (-1, 1) => Direction::SouthWest,
            _ => Direction::Here,
        }
    }
}

/// One discrete command emitted to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Walk (or attack into) a direction.
    Move(Direction),
    /// Dig into a direction.
    Tunnel(Direction),
    /// A single command key ('<', '>', ',', 'R', ...).
    Key(char),
    /// Use the inventory item in this slot (quaff/read/eat/zap per kind).
    UseItem(usize),
    /// Wear/wield the inventory item in this slot.
    WearItem(usize),
    /// Take off the equipment in this named slot index.
    RemoveSlot(usize),
    /// Sell the inventory item to the shop being visited.
    SellItem { slot: usize, quantity: u16 },
    /// Buy a ware from the shop being visited.
    BuyWare { ware: usize, quantity: u16 },
    /// Free-text answer to a host prompt.
    Text(String),
}

/// The action sink and session status, implemented by the host binding.
pub trait Host {
    /// Deliver one action. The core never reads a synchronous response.
    fn emit(&mut self, action: Action);

    /// True once the host has signalled death or desync; the core must stop
    /// emitting actions and must not run sandbox mutations afterwards.
    fn session_over(&self) -> bool;
}

/// Target families the pathing collaborator can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum FlowGoal {
    NearestObject,
    NearestMonster,
    Unexplored,
    StairsUp,
    StairsDown,
    AnyStairs,
    Shop(usize),
    Tile(Pos),
    SafeTile,
}

/// Flood-fill pathing, consumed as a black box.
pub trait PathFinder {
    /// Next step toward the goal, or `None` when no viable path exists.
    fn next_step(&mut self, snapshot: &WorldSnapshot, goal: FlowGoal) -> Option<Direction>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toward_steps_diagonally() {
        let from = Pos::new(5, 5);
        assert_eq!(Direction::toward(from, Pos::new(9, 1)), Direction::NorthEast);
        assert_eq!(Direction::toward(from, Pos::new(5, 9)), Direction::South);
        assert_eq!(Direction::toward(from, from), Direction::Here);
    }

    #[test]
    fn deltas_are_unit_steps() {
        use strum::IntoEnumIterator;
        for dir in Direction::iter() {
            let (dx, dy) = dir.delta();
            assert!(dx.abs() <= 1 && dy.abs() <= 1);
        }
    }
}
