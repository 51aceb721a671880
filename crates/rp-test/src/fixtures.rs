//! Canned contexts and items shared across the integration tests.

use rp_core::config::PilotConfig;
use rp_core::snapshot::item::{Item, ItemKind, Tval};
use rp_core::snapshot::terrain::{Feature, Pos};
use rp_core::snapshot::{Slot, sv};
use rp_core::EngineContext;

pub fn heal_potion(qty: u16) -> Item {
    Item::of(ItemKind::new(Tval::Potion, sv::POTION_HEAL), qty).with_value(50)
}

pub fn ration(qty: u16) -> Item {
    Item::of(ItemKind::new(Tval::Food, sv::FOOD_RATION), qty).with_value(3)
}

pub fn oil_flask(qty: u16) -> Item {
    Item::of(ItemKind::new(Tval::Flask, 1), qty).with_value(2)
}

pub fn recall_scroll(qty: u16) -> Item {
    Item::of(ItemKind::new(Tval::Scroll, sv::SCROLL_RECALL), qty).with_value(150)
}

pub fn lantern() -> Item {
    let mut lamp = Item::of(ItemKind::new(Tval::Light, sv::LIGHT_LANTERN), 1)
        .identified()
        .with_value(100);
    lamp.pval = 2;
    lamp
}

pub fn sword(dice: u8, sides: u8) -> Item {
    let mut blade = Item::of(ItemKind::new(Tval::Weapon, 2), 1)
        .identified()
        .with_value(200);
    blade.damage_dice = dice;
    blade.damage_sides = sides;
    blade
}

/// A healthy level-5 character standing in town with refreshes done.
pub fn town_context(seed: u64) -> EngineContext {
    let mut ctx = EngineContext::new(PilotConfig::default(), seed);
    let snap = &mut ctx.snapshot;
    snap.player.cur_hp = 40;
    snap.player.max_hp = 40;
    snap.player.level = 5;
    snap.player.max_level = 5;
    snap.refresh.equipment = false;
    snap.refresh.inventory = false;
    snap.refresh.spells = false;
    snap.refresh.panel = false;
    snap.notice();
    ctx
}

/// The same character, supplied and dropped on a dungeon level.
pub fn dungeon_context(seed: u64, depth: i32) -> EngineContext {
    let mut ctx = town_context(seed);
    let snap = &mut ctx.snapshot;
    snap.player.depth = depth;
    snap.player.max_depth = depth;
    snap.inventory[0] = ration(5);
    snap.inventory[1] = oil_flask(5);
    snap.inventory[2] = heal_potion(4);
    snap.inventory[3] = recall_scroll(2);
    snap.equipment.set(Slot::Light, Some(lantern()));
    snap.equipment.set(Slot::Weapon, Some(sword(2, 6)));
    snap.notice();
    ctx
}

/// Carve a rectangular room of floor into level memory.
pub fn carve_room(ctx: &mut EngineContext, from: Pos, to: Pos) {
    for x in from.x..=to.x {
        for y in from.y..=to.y {
            let feature = if x == from.x || x == to.x || y == from.y || y == to.y {
                Feature::Wall
            } else {
                Feature::Floor
            };
            ctx.snapshot.level.features.insert(Pos::new(x, y), feature);
        }
    }
}
