//! Immediate-survival proposers: light, food, status cures, emergency
//! healing, recall when supplies run out. These sit at the head of every
//! priority chain because nothing else matters while starving in the dark.

use strum::IntoEnumIterator;

use crate::context::EngineContext;
use crate::goal::GoalKind;
use crate::host::{Action, Direction};
use crate::snapshot::item::Tval;
use crate::snapshot::skills::Skill;
use crate::snapshot::terrain::{Feature, Pos};
use crate::snapshot::{sv, Slot, WorldSnapshot};

use super::{find_pack, Services};

fn find_food(snap: &WorldSnapshot) -> Option<usize> {
    find_pack(snap, |i| i.kind.tval == Tval::Food)
}

/// No light: wear any carried torch or lantern.
pub fn wear_light(ctx: &mut EngineContext, _services: &mut Services) -> Option<Action> {
    if ctx.snapshot.in_town() || ctx.snapshot.skills.get(Skill::LightRadius) > 0 {
        return None;
    }
    let idx = find_pack(&ctx.snapshot, |i| i.kind.tval == Tval::Light)?;
    ctx.note("dark, wearing a light");
    Some(Action::WearItem(idx))
}

/// Eat when weak or hungry.
pub fn eat(ctx: &mut EngineContext, _services: &mut Services) -> Option<Action> {
    let skills = &ctx.snapshot.skills;
    if !skills.has(Skill::IsWeak) && !skills.has(Skill::IsHungry) {
        return None;
    }
    let idx = find_food(&ctx.snapshot)?;
    ctx.note("eating");
    Some(Action::UseItem(idx))
}

/// Cure poison before it grinds HP away.
pub fn cure(ctx: &mut EngineContext, _services: &mut Services) -> Option<Action> {
    if !ctx.snapshot.skills.has(Skill::IsPoisoned) {
        return None;
    }
    let idx = find_pack(&ctx.snapshot, |i| {
        i.kind.tval == Tval::Potion
            && (i.kind.sval == sv::POTION_CURE_POISON || i.kind.sval == sv::POTION_CURE_WOUNDS)
    })?;
    ctx.note("curing poison");
    Some(Action::UseItem(idx))
}

/// Quaff a heal when HP drops below a quarter.
pub fn heal(ctx: &mut EngineContext, _services: &mut Services) -> Option<Action> {
    let skills = &ctx.snapshot.skills;
    if skills.get(Skill::CurHp) * 4 >= skills.get(Skill::MaxHp) {
        return None;
    }
    let idx = find_pack(&ctx.snapshot, |i| {
        i.kind.tval == Tval::Potion && i.kind.sval == sv::POTION_HEAL
    })?;
    ctx.note("emergency heal");
    Some(Action::UseItem(idx))
}

/// Dig back out of a sealed corridor.
///
/// After an anti-summon fight the pilot can be walled in on all sides;
/// with a digger at hand it tunnels toward the softest obstruction.
/// Declines the moment any neighbour is walkable.
pub fn dig_out(ctx: &mut EngineContext, _services: &mut Services) -> Option<Action> {
    if ctx.snapshot.in_town() {
        return None;
    }
    let has_digger = ctx
        .snapshot
        .equipment
        .get(Slot::Weapon)
        .is_some_and(|w| w.kind.tval == Tval::Digger)
        || find_pack(&ctx.snapshot, |i| i.kind.tval == Tval::Digger).is_some();
    if !has_digger {
        return None;
    }

    let pos = ctx.snapshot.pos;
    let mut best: Option<(Direction, bool)> = None;
    for dir in Direction::iter().filter(|d| *d != Direction::Here) {
        let (dx, dy) = dir.delta();
        match ctx.snapshot.level.feature_at(Pos::new(pos.x + dx, pos.y + dy)) {
            Feature::Floor
            | Feature::DoorOpen
            | Feature::DoorClosed
            | Feature::StairsUp
            | Feature::StairsDown
            | Feature::ShopEntrance(_) => return None,
            Feature::Rubble => {
                if best.map_or(true, |(_, rubble)| !rubble) {
                    best = Some((dir, true));
                }
            }
            Feature::Wall => {
                if best.is_none() {
                    best = Some((dir, false));
                }
            }
            Feature::Unknown => {}
        }
    }

    let (dir, _) = best?;
    ctx.goal.kind = GoalKind::Dig;
    ctx.note("sealed in, digging out");
    Some(Action::Tunnel(dir))
}

/// Read recall when the restock check says the trip is overdue.
pub fn recall_when_spent(ctx: &mut EngineContext, _services: &mut Services) -> Option<Action> {
    if ctx.snapshot.in_town() || ctx.goal.recalling {
        return None;
    }
    let depth = ctx.snapshot.player.depth;
    let reason = crate::prepared::restock(&ctx.snapshot, depth)?;
    let idx = find_pack(&ctx.snapshot, |i| {
        i.kind.tval == Tval::Scroll && i.kind.sval == sv::SCROLL_RECALL
    })?;
    ctx.goal.recalling = true;
    ctx.note(format!("recalling to town: {reason}"));
    Some(Action::UseItem(idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PilotConfig;
    use crate::host::{Direction, FlowGoal, PathFinder};
    use crate::snapshot::item::{Item, ItemKind};

    struct NoPath;
    impl PathFinder for NoPath {
        fn next_step(&mut self, _: &WorldSnapshot, _: FlowGoal) -> Option<Direction> {
            None
        }
    }

    fn ctx() -> EngineContext {
        let mut ctx = EngineContext::new(PilotConfig::default(), 1);
        ctx.snapshot.player.depth = 5;
        ctx.snapshot.player.cur_hp = 40;
        ctx.snapshot.player.max_hp = 40;
        ctx
    }

    #[test]
    fn eats_when_hungry() {
        let mut ctx = ctx();
        ctx.snapshot.player.is_hungry = true;
        ctx.snapshot.inventory[2] = Item::of(ItemKind::new(Tval::Food, sv::FOOD_RATION), 3);
        ctx.snapshot.notice();
        let mut path = NoPath;
        let mut services = Services { path: &mut path };
        assert_eq!(eat(&mut ctx, &mut services), Some(Action::UseItem(2)));
    }

    #[test]
    fn no_food_declines() {
        let mut ctx = ctx();
        ctx.snapshot.player.is_hungry = true;
        ctx.snapshot.notice();
        let mut path = NoPath;
        let mut services = Services { path: &mut path };
        assert_eq!(eat(&mut ctx, &mut services), None);
    }

    #[test]
    fn heals_below_a_quarter() {
        let mut ctx = ctx();
        ctx.snapshot.player.cur_hp = 9;
        ctx.snapshot.inventory[0] =
            Item::of(ItemKind::new(Tval::Potion, sv::POTION_HEAL), 2).with_value(50);
        ctx.snapshot.notice();
        let mut path = NoPath;
        let mut services = Services { path: &mut path };
        assert_eq!(heal(&mut ctx, &mut services), Some(Action::UseItem(0)));
        ctx.snapshot.player.cur_hp = 30;
        ctx.snapshot.notice();
        assert_eq!(heal(&mut ctx, &mut services), None);
    }

    #[test]
    fn recall_fires_once() {
        let mut ctx = ctx();
        ctx.snapshot.player.depth = 10;
        // Out of food entirely, but carrying recall.
        ctx.snapshot.inventory[0] =
            Item::of(ItemKind::new(Tval::Scroll, sv::SCROLL_RECALL), 1).with_value(150);
        ctx.snapshot.notice();
        let mut path = NoPath;
        let mut services = Services { path: &mut path };
        assert_eq!(
            recall_when_spent(&mut ctx, &mut services),
            Some(Action::UseItem(0))
        );
        assert!(ctx.goal.recalling);
        assert_eq!(recall_when_spent(&mut ctx, &mut services), None);
    }

    fn seal_in(ctx: &mut EngineContext, rubble_at: Option<Pos>) {
        let pos = ctx.snapshot.pos;
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let p = Pos::new(pos.x + dx, pos.y + dy);
                let f = if rubble_at == Some(p) {
                    Feature::Rubble
                } else {
                    Feature::Wall
                };
                ctx.snapshot.level.features.insert(p, f);
            }
        }
    }

    #[test]
    fn digs_out_when_sealed_in() {
        let mut ctx = ctx();
        ctx.snapshot.pos = Pos::new(5, 5);
        ctx.snapshot.equipment.set(
            Slot::Weapon,
            Some(Item::of(ItemKind::new(Tval::Digger, 1), 1).identified()),
        );
        seal_in(&mut ctx, Some(Pos::new(6, 5)));
        ctx.snapshot.notice();
        let mut path = NoPath;
        let mut services = Services { path: &mut path };
        // Rubble is softer than wall: dig east.
        assert_eq!(
            dig_out(&mut ctx, &mut services),
            Some(Action::Tunnel(Direction::East))
        );
        assert_eq!(ctx.goal.kind, GoalKind::Dig);
    }

    #[test]
    fn open_neighbour_means_no_digging() {
        let mut ctx = ctx();
        ctx.snapshot.pos = Pos::new(5, 5);
        ctx.snapshot.equipment.set(
            Slot::Weapon,
            Some(Item::of(ItemKind::new(Tval::Digger, 1), 1).identified()),
        );
        seal_in(&mut ctx, None);
        ctx.snapshot
            .level
            .features
            .insert(Pos::new(4, 5), Feature::Floor);
        ctx.snapshot.notice();
        let mut path = NoPath;
        let mut services = Services { path: &mut path };
        assert_eq!(dig_out(&mut ctx, &mut services), None);
    }

    #[test]
    fn no_digger_no_digging() {
        let mut ctx = ctx();
        ctx.snapshot.pos = Pos::new(5, 5);
        seal_in(&mut ctx, None);
        ctx.snapshot.notice();
        let mut path = NoPath;
        let mut services = Services { path: &mut path };
        assert_eq!(dig_out(&mut ctx, &mut services), None);
    }

    #[test]
    fn wears_torch_in_the_dark() {
        let mut ctx = ctx();
        ctx.snapshot.inventory[1] =
            Item::of(ItemKind::new(Tval::Light, sv::LIGHT_TORCH), 1).with_value(2);
        ctx.snapshot.notice();
        let mut path = NoPath;
        let mut services = Services { path: &mut path };
        assert_eq!(wear_light(&mut ctx, &mut services), Some(Action::WearItem(1)));
    }
}
