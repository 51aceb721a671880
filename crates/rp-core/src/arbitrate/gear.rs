//! Gear proposers: wear what helps, shed what hurts.
//!
//! Both run their candidates through sandbox trials, so a proposal here is
//! already known to raise power.

use crate::context::EngineContext;
use crate::host::Action;
use crate::sandbox::{self, Scope};
use crate::snapshot::item::Tval;
use crate::snapshot::Slot;

use super::Services;

/// Ring purchases and pickups go to the left hand by default; the right
/// hand is the overflow.
fn slots_for(item_tval: Tval) -> Vec<Slot> {
    if item_tval == Tval::Ring {
        vec![Slot::RingLeft, Slot::RingRight]
    } else {
        Slot::for_tval(item_tval).into_iter().collect()
    }
}

/// Wear the carried item whose trial shows the biggest power gain.
pub fn wear_best(ctx: &mut EngineContext, _services: &mut Services) -> Option<Action> {
    let mut best: Option<(usize, i64)> = None;
    for idx in 0..ctx.snapshot.inventory.len() {
        let item = ctx.snapshot.inventory[idx].clone();
        if item.is_empty() || item.cursed || !item.kind.tval.is_wearable() {
            continue;
        }
        for slot in slots_for(item.kind.tval) {
            let outcome =
                sandbox::with_mutation(&mut ctx.snapshot, &ctx.config, Scope::GEAR, |s| {
                    sandbox::wear_from_inventory(s, idx, slot)
                });
            let gain = outcome.power_gain();
            if gain > 0 && best.map_or(true, |(_, g)| gain > g) {
                best = Some((idx, gain));
            }
        }
    }
    let (idx, gain) = best?;
    ctx.note(format!("wearing better gear (+{gain})"));
    Some(Action::WearItem(idx))
}

/// Take off a worn piece whose absence raises power. Cursed gear will not
/// come off, so it never qualifies.
pub fn remove_bad(ctx: &mut EngineContext, _services: &mut Services) -> Option<Action> {
    if ctx.snapshot.pack_full() {
        return None;
    }
    for slot in [
        Slot::Weapon,
        Slot::Bow,
        Slot::RingLeft,
        Slot::RingRight,
        Slot::Amulet,
        Slot::Body,
        Slot::Cloak,
        Slot::Shield,
        Slot::Helm,
        Slot::Gloves,
        Slot::Boots,
    ] {
        let Some(item) = ctx.snapshot.equipment.get(slot) else {
            continue;
        };
        if item.cursed {
            continue;
        }
        let outcome = sandbox::with_mutation(&mut ctx.snapshot, &ctx.config, Scope::GEAR, |s| {
            let removed = s.equipment.set(slot, None);
            if let (Some(item), Some(empty)) = (removed, s.first_empty_slot()) {
                s.inventory[empty] = item;
            }
            Ok(())
        });
        if outcome.power_gain() > 0 {
            ctx.note("removing harmful gear");
            return Some(Action::RemoveSlot(slot as usize));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PilotConfig;
    use crate::host::{Direction, FlowGoal, PathFinder};
    use crate::snapshot::item::{Item, ItemFlags, ItemKind};
    use crate::snapshot::WorldSnapshot;

    struct NoPath;
    impl PathFinder for NoPath {
        fn next_step(&mut self, _: &WorldSnapshot, _: FlowGoal) -> Option<Direction> {
            None
        }
    }

    fn ctx() -> EngineContext {
        let mut ctx = EngineContext::new(PilotConfig::default(), 1);
        ctx.snapshot.player.cur_hp = 30;
        ctx.snapshot.player.max_hp = 30;
        ctx.snapshot.player.level = 5;
        ctx
    }

    #[test]
    fn wears_a_better_weapon() {
        let mut ctx = ctx();
        let mut sword = Item::of(ItemKind::new(Tval::Weapon, 2), 1).identified();
        sword.damage_dice = 2;
        sword.damage_sides = 6;
        ctx.snapshot.inventory[4] = sword;
        ctx.snapshot.notice();
        let mut path = NoPath;
        let mut services = Services { path: &mut path };
        assert_eq!(wear_best(&mut ctx, &mut services), Some(Action::WearItem(4)));
    }

    #[test]
    fn never_proposes_a_downgrade() {
        let mut ctx = ctx();
        let mut wielded = Item::of(ItemKind::new(Tval::Weapon, 2), 1).identified();
        wielded.damage_dice = 3;
        wielded.damage_sides = 8;
        ctx.snapshot.equipment.set(Slot::Weapon, Some(wielded));
        let mut dagger = Item::of(ItemKind::new(Tval::Weapon, 1), 1).identified();
        dagger.damage_dice = 1;
        dagger.damage_sides = 3;
        ctx.snapshot.inventory[0] = dagger;
        ctx.snapshot.notice();
        let mut path = NoPath;
        let mut services = Services { path: &mut path };
        assert_eq!(wear_best(&mut ctx, &mut services), None);
    }

    #[test]
    fn second_ring_goes_to_the_free_hand() {
        let mut ctx = ctx();
        let pois = Item::of(ItemKind::new(Tval::Ring, 2), 1)
            .identified()
            .with_flags(ItemFlags::RES_POIS);
        ctx.snapshot.equipment.set(Slot::RingLeft, Some(pois));
        let fire = Item::of(ItemKind::new(Tval::Ring, 3), 1)
            .identified()
            .with_flags(ItemFlags::RES_FIRE);
        ctx.snapshot.inventory[0] = fire;
        ctx.snapshot.notice();
        let mut path = NoPath;
        let mut services = Services { path: &mut path };
        // The trial finds the right hand rather than displacing the left.
        assert_eq!(wear_best(&mut ctx, &mut services), Some(Action::WearItem(0)));
    }

    #[test]
    fn removes_aggravating_gear() {
        let mut ctx = ctx();
        let noisy = Item::of(ItemKind::new(Tval::Amulet, 1), 1)
            .identified()
            .with_flags(ItemFlags::AGGRAVATE);
        ctx.snapshot.equipment.set(Slot::Amulet, Some(noisy));
        ctx.snapshot.notice();
        let mut path = NoPath;
        let mut services = Services { path: &mut path };
        assert_eq!(
            remove_bad(&mut ctx, &mut services),
            Some(Action::RemoveSlot(Slot::Amulet as usize))
        );
    }

    #[test]
    fn cursed_gear_stays_put() {
        let mut ctx = ctx();
        let mut cursed = Item::of(ItemKind::new(Tval::Amulet, 1), 1).identified();
        cursed.cursed = true;
        cursed.flags = ItemFlags::AGGRAVATE;
        ctx.snapshot.equipment.set(Slot::Amulet, Some(cursed));
        ctx.snapshot.notice();
        let mut path = NoPath;
        let mut services = Services { path: &mut path };
        assert_eq!(remove_bad(&mut ctx, &mut services), None);
    }
}
