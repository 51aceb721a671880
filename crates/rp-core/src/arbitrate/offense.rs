//! Offense proposers: melee the neighbour, shoot the approacher.

use crate::context::EngineContext;
use crate::host::{Action, Direction};
use crate::snapshot::item::Tval;
use crate::snapshot::Slot;

use super::{find_pack, Services};

/// Longest range worth loosing a shot over.
const SHOT_RANGE: i32 = 6;

/// Bump-attack an adjacent monster, strongest threat first.
///
/// Declines when every neighbour hits harder than the pilot will accept,
/// unless the escalation ladder is forcing the issue.
pub fn attack_adjacent(ctx: &mut EngineContext, _services: &mut Services) -> Option<Action> {
    let tolerance = ctx.danger_tolerance();
    let target = ctx
        .snapshot
        .level
        .monsters
        .iter()
        .filter(|m| m.pos.is_adjacent(ctx.snapshot.pos))
        .filter(|m| ctx.goal.ignoring || m.expected_damage <= tolerance)
        .max_by_key(|m| m.expected_damage)?;

    let dir = Direction::toward(ctx.snapshot.pos, target.pos);
    // Charging: suppress retreat for a few turns so we do not bounce.
    ctx.clock.no_retreat = 3;
    ctx.note("attacking adjacent monster");
    Some(Action::Move(dir))
}

/// Loose ammunition at the nearest awake monster in range.
pub fn shoot(ctx: &mut EngineContext, _services: &mut Services) -> Option<Action> {
    ctx.snapshot.equipment.get(Slot::Bow)?;
    let ammo = find_pack(&ctx.snapshot, |i| i.kind.tval == Tval::Ammo)?;
    let in_range = ctx.snapshot.level.monsters.iter().any(|m| {
        let d = ctx.snapshot.pos.distance(m.pos);
        m.awake && d > 1 && d <= SHOT_RANGE
    });
    if !in_range {
        return None;
    }
    ctx.note("shooting");
    Some(Action::UseItem(ammo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PilotConfig;
    use crate::host::{FlowGoal, PathFinder};
    use crate::snapshot::item::{Item, ItemKind};
    use crate::snapshot::terrain::{KnownMonster, Pos};
    use crate::snapshot::WorldSnapshot;

    struct NoPath;
    impl PathFinder for NoPath {
        fn next_step(&mut self, _: &WorldSnapshot, _: FlowGoal) -> Option<Direction> {
            None
        }
    }

    fn monster(pos: Pos, expected_damage: i32) -> KnownMonster {
        KnownMonster {
            pos,
            awake: true,
            breeder: false,
            expected_damage,
            kill_value: 10,
            last_seen: 0,
        }
    }

    fn ctx() -> EngineContext {
        let mut ctx = EngineContext::new(PilotConfig::default(), 1);
        ctx.snapshot.player.depth = 2;
        ctx.snapshot.player.cur_hp = 50;
        ctx.snapshot.player.max_hp = 50;
        ctx.snapshot.pos = Pos::new(5, 5);
        ctx
    }

    #[test]
    fn attacks_the_neighbour() {
        let mut ctx = ctx();
        ctx.snapshot.level.monsters.push(monster(Pos::new(6, 5), 4));
        ctx.snapshot.notice();
        let mut path = NoPath;
        let mut services = Services { path: &mut path };
        assert_eq!(
            attack_adjacent(&mut ctx, &mut services),
            Some(Action::Move(Direction::East))
        );
        assert!(ctx.clock.no_retreat > 0);
    }

    #[test]
    fn declines_an_overwhelming_neighbour() {
        let mut ctx = ctx();
        // Tolerance at 50 HP is 30; a 45-damage hit is too much.
        ctx.snapshot.level.monsters.push(monster(Pos::new(6, 5), 45));
        ctx.snapshot.notice();
        let mut path = NoPath;
        let mut services = Services { path: &mut path };
        assert_eq!(attack_adjacent(&mut ctx, &mut services), None);
        // Unless the ladder says otherwise.
        ctx.goal.ignoring = true;
        assert!(attack_adjacent(&mut ctx, &mut services).is_some());
    }

    #[test]
    fn shoots_only_with_launcher_and_ammo() {
        let mut ctx = ctx();
        ctx.snapshot.level.monsters.push(monster(Pos::new(8, 5), 4));
        ctx.snapshot.notice();
        let mut path = NoPath;
        let mut services = Services { path: &mut path };
        assert_eq!(shoot(&mut ctx, &mut services), None);

        let mut bow = Item::of(ItemKind::new(Tval::Bow, 1), 1).identified();
        bow.damage_sides = 6;
        bow.pval = 2;
        ctx.snapshot.equipment.set(Slot::Bow, Some(bow));
        ctx.snapshot.inventory[3] = Item::of(ItemKind::new(Tval::Ammo, 1), 20).with_value(1);
        ctx.snapshot.notice();
        assert_eq!(shoot(&mut ctx, &mut services), Some(Action::UseItem(3)));
    }
}
