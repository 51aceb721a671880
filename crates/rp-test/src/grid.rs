//! Breadth-first pathing over level memory.
//!
//! A real (if simple) implementation of the pathing seam: floods out from
//! the player over known-passable tiles and returns the first step of the
//! shortest path to whatever the flow goal names.

use hashbrown::{HashMap, HashSet};
use std::collections::VecDeque;

use rp_core::snapshot::terrain::{Feature, Pos};
use rp_core::snapshot::WorldSnapshot;
use rp_core::{Direction, FlowGoal, PathFinder};

const DIRECTIONS: [Direction; 8] = [
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
    Direction::NorthEast,
    Direction::NorthWest,
    Direction::SouthEast,
    Direction::SouthWest,
];

#[derive(Debug, Default)]
pub struct GridPath;

fn passable(feature: Feature) -> bool {
    matches!(
        feature,
        Feature::Floor
            | Feature::DoorOpen
            | Feature::StairsUp
            | Feature::StairsDown
            | Feature::ShopEntrance(_)
    )
}

fn neighbours(pos: Pos) -> impl Iterator<Item = (Direction, Pos)> {
    DIRECTIONS.iter().map(move |&dir| {
        let (dx, dy) = dir.delta();
        (dir, Pos::new(pos.x + dx, pos.y + dy))
    })
}

/// Tiles the goal accepts as destinations.
fn targets(snap: &WorldSnapshot, goal: FlowGoal) -> Vec<Pos> {
    let level = &snap.level;
    match goal {
        FlowGoal::Tile(pos) => vec![pos],
        FlowGoal::NearestObject => level.objects.iter().map(|o| o.pos).collect(),
        FlowGoal::NearestMonster => level.monsters.iter().map(|m| m.pos).collect(),
        FlowGoal::StairsUp => stair_tiles(snap, Feature::StairsUp, &level.stairs_up),
        FlowGoal::StairsDown => stair_tiles(snap, Feature::StairsDown, &level.stairs_down),
        FlowGoal::AnyStairs => {
            let mut tiles = stair_tiles(snap, Feature::StairsUp, &level.stairs_up);
            tiles.extend(stair_tiles(snap, Feature::StairsDown, &level.stairs_down));
            tiles
        }
        FlowGoal::Shop(idx) => level
            .features
            .iter()
            .filter(|(_, f)| **f == Feature::ShopEntrance(idx as u8))
            .map(|(p, _)| *p)
            .collect(),
        FlowGoal::Unexplored => frontier_tiles(level.features.iter()),
        FlowGoal::SafeTile => safe_tiles(snap),
    }
}

fn stair_tiles(snap: &WorldSnapshot, feature: Feature, tracked: &[Pos]) -> Vec<Pos> {
    let mut tiles: Vec<Pos> = snap
        .level
        .features
        .iter()
        .filter(|(_, f)| **f == feature)
        .map(|(p, _)| *p)
        .collect();
    for &pos in tracked {
        if !tiles.contains(&pos) {
            tiles.push(pos);
        }
    }
    tiles
}

/// Known floor tiles that border unknown ground.
fn frontier_tiles<'a>(features: impl Iterator<Item = (&'a Pos, &'a Feature)>) -> Vec<Pos> {
    let known: HashMap<Pos, Feature> = features.map(|(p, f)| (*p, *f)).collect();
    known
        .iter()
        .filter(|(_, f)| passable(**f))
        .filter(|(pos, _)| neighbours(**pos).any(|(_, n)| !known.contains_key(&n)))
        .map(|(pos, _)| *pos)
        .collect()
}

/// Passable tiles at least three tiles from every known monster.
fn safe_tiles(snap: &WorldSnapshot) -> Vec<Pos> {
    snap.level
        .features
        .iter()
        .filter(|(_, f)| passable(**f))
        .filter(|(pos, _)| {
            snap.level
                .monsters
                .iter()
                .all(|m| pos.distance(m.pos) >= 3)
        })
        .filter(|(pos, _)| **pos != snap.pos)
        .map(|(pos, _)| *pos)
        .collect()
}

impl PathFinder for GridPath {
    fn next_step(&mut self, snap: &WorldSnapshot, goal: FlowGoal) -> Option<Direction> {
        let targets: HashSet<Pos> = targets(snap, goal).into_iter().collect();
        if targets.is_empty() || targets.contains(&snap.pos) {
            return None;
        }

        // BFS from the player; remember each tile's first step.
        let mut first_step: HashMap<Pos, Direction> = HashMap::new();
        let mut queue = VecDeque::new();
        queue.push_back(snap.pos);
        first_step.insert(snap.pos, Direction::Here);

        while let Some(pos) = queue.pop_front() {
            for (dir, next) in neighbours(pos) {
                if first_step.contains_key(&next) {
                    continue;
                }
                // Target tiles may be walked onto even if not "passable"
                // (a monster's tile, say); anything else must be.
                if !targets.contains(&next) && !passable(snap.level.feature_at(next)) {
                    continue;
                }
                let step = if pos == snap.pos {
                    dir
                } else {
                    first_step[&pos]
                };
                if targets.contains(&next) {
                    return Some(step);
                }
                first_step.insert(next, step);
                queue.push_back(next);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_floor(snap: &mut WorldSnapshot, w: i32, h: i32) {
        for x in 0..w {
            for y in 0..h {
                snap.level.features.insert(Pos::new(x, y), Feature::Floor);
            }
        }
    }

    #[test]
    fn walks_straight_at_a_tile() {
        let mut snap = WorldSnapshot::new();
        open_floor(&mut snap, 10, 10);
        snap.pos = Pos::new(1, 1);
        let mut path = GridPath;
        assert_eq!(
            path.next_step(&snap, FlowGoal::Tile(Pos::new(5, 1))),
            Some(Direction::East)
        );
    }

    #[test]
    fn routes_around_walls() {
        let mut snap = WorldSnapshot::new();
        open_floor(&mut snap, 5, 5);
        // A wall column with a gap at the bottom.
        for y in 0..4 {
            snap.level.features.insert(Pos::new(2, y), Feature::Wall);
        }
        snap.pos = Pos::new(1, 1);
        let step = path_step(&snap, FlowGoal::Tile(Pos::new(4, 1)));
        // Must head for the gap, not straight east into the wall.
        assert!(matches!(
            step,
            Some(Direction::South) | Some(Direction::SouthEast)
        ));
    }

    fn path_step(snap: &WorldSnapshot, goal: FlowGoal) -> Option<Direction> {
        GridPath.next_step(snap, goal)
    }

    #[test]
    fn no_path_means_none() {
        let mut snap = WorldSnapshot::new();
        snap.level.features.insert(Pos::new(0, 0), Feature::Floor);
        snap.pos = Pos::new(0, 0);
        let mut path = GridPath;
        assert_eq!(path.next_step(&snap, FlowGoal::Tile(Pos::new(9, 9))), None);
    }

    #[test]
    fn finds_tracked_stairs() {
        let mut snap = WorldSnapshot::new();
        open_floor(&mut snap, 8, 3);
        snap.level
            .features
            .insert(Pos::new(6, 1), Feature::StairsDown);
        snap.pos = Pos::new(0, 1);
        let mut path = GridPath;
        assert_eq!(
            path.next_step(&snap, FlowGoal::StairsDown),
            Some(Direction::East)
        );
    }

    #[test]
    fn standing_on_the_target_is_done() {
        let mut snap = WorldSnapshot::new();
        open_floor(&mut snap, 3, 3);
        snap.pos = Pos::new(1, 1);
        let mut path = GridPath;
        assert_eq!(path.next_step(&snap, FlowGoal::Tile(Pos::new(1, 1))), None);
    }
}
