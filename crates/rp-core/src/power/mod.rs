//! The power evaluator: one comparable utility number per snapshot.
//!
//! Deterministic and side-effect free; the transaction planner's
//! differential comparisons depend on that. Weights are designer-tuned
//! integers, biased by the worship flags from config.

pub mod home;

use crate::config::PilotConfig;
use crate::snapshot::item::Tval;
use crate::snapshot::skills::Skill;
use crate::snapshot::{Slot, WorldSnapshot};

pub use home::{home_power, home_power_with};

/// Expected melee damage per round, scaled.
fn melee_damage(snap: &WorldSnapshot) -> i64 {
    let skills = &snap.skills;
    let blows = skills.get(Skill::Blows).max(1) as i64;
    let weapon = snap.equipment.get(Slot::Weapon);

    let dice = weapon.map_or(0, |w| w.blow_damage());
    let bonus_dam = weapon.map_or(0, |w| if w.ident { w.to_dam as i64 } else { 0 });

    dice * blows + (skills.get(Skill::ToDam) as i64 + bonus_dam) * 25 * blows
}

/// Expected missile damage per round, scaled. Zero without a launcher.
fn missile_damage(snap: &WorldSnapshot) -> i64 {
    let skills = &snap.skills;
    if snap.equipment.get(Slot::Bow).is_none() {
        return 0;
    }
    let shots = skills.get(Skill::Shots).max(1) as i64;
    let per_shot = skills.get(Skill::AmmoSides).max(1) as i64
        * skills.get(Skill::AmmoPower).max(1) as i64
        * 20;
    // A launcher with no ammunition is close to worthless.
    let ammo = snap.count_where(|i| i.kind.tval == Tval::Ammo) as i64;
    if ammo == 0 {
        per_shot / 10
    } else {
        per_shot * shots
    }
}

/// Expected device damage per round from the best carried attack wand/rod.
fn device_damage(snap: &WorldSnapshot) -> i64 {
    snap.inventory
        .iter()
        .filter(|i| !i.is_empty() && i.aware)
        .filter(|i| matches!(i.kind.tval, Tval::Wand | Tval::Rod))
        .map(|i| {
            let charges = if i.kind.tval == Tval::Wand {
                i.pval.max(0) as i64
            } else {
                // Rods recharge; treat a ready rod as a steady supply.
                if i.timeout == 0 { 4 } else { 1 }
            };
            i.blow_damage() + charges * 50
        })
        .max()
        .unwrap_or(0)
}

/// Offensive capability: the best attack method carries the score, the
/// others contribute a small readiness bonus.
fn offense(snap: &WorldSnapshot, cfg: &PilotConfig) -> i64 {
    let melee = melee_damage(snap);
    let missile = missile_damage(snap);
    let device = device_damage(snap);
    let best = melee.max(missile).max(device);
    let rest = melee + missile + device - best;

    let mut value = best * 3 + rest / 4;
    value += snap.skills.get(Skill::ToHit) as i64 * 100;
    if cfg.worships_damage {
        value += best;
    }
    // Low-level characters need every blow they can get.
    if snap.skills.get(Skill::Level) <= 10 {
        value += snap.skills.get(Skill::Blows).max(1) as i64 * 4_500;
    }
    value
}

/// Survivability: HP/SP reserves, armour, resists, statuses.
fn defense(snap: &WorldSnapshot, cfg: &PilotConfig) -> i64 {
    let skills = &snap.skills;
    let mut value = 0i64;

    value += skills.get(Skill::MaxHp) as i64 * 150;
    value += skills.get(Skill::CurHp) as i64 * 30;
    value += skills.get(Skill::MaxSp) as i64 * 60;
    value += skills.get(Skill::CurSp) as i64 * 10;
    value += (skills.get(Skill::ArmorClass).min(50)) as i64 * 300;

    let speed_weight: i64 = if cfg.worships_speed { 5_000 } else { 3_000 };
    value += skills.get(Skill::Speed) as i64 * speed_weight;

    // Light: strongly rewarded up to radius 3, marginal past that.
    let light = skills.get(Skill::LightRadius) as i64;
    value += light.min(3) * 10_000 + (light - 3).max(0) * 1_000;

    value += skills.get(Skill::Stealth).min(10) as i64 * 1_500;

    let depth = skills.get(Skill::MaxDepth) as i64;
    for (skill, weight) in [
        (Skill::ResFire, 8_000i64),
        (Skill::ResCold, 8_000),
        (Skill::ResElec, 8_000),
        (Skill::ResAcid, 6_000),
        (Skill::ResPois, 15_000),
    ] {
        if skills.has(skill) {
            value += weight;
        }
    }
    if skills.has(Skill::FreeAction) {
        value += 10_000 + depth * 200;
    }
    if skills.has(Skill::SeeInvis) {
        value += 5_000 + depth * 100;
    }
    if skills.has(Skill::Telepathy) {
        value += 15_000;
    }
    if skills.has(Skill::Regen) {
        value += 5_000;
    }
    value += skills.get(Skill::SustainCount) as i64 * 1_000;

    // Penalties.
    value -= skills.get(Skill::CursedGear) as i64 * 5_000;
    if skills.has(Skill::Encumbered) {
        value -= 10_000;
    }
    if skills.has(Skill::Aggravates) {
        value -= 8_000;
    }

    value
}

/// Resource sufficiency: consumables, capped so hoarding stops paying.
fn supplies(snap: &WorldSnapshot) -> i64 {
    let skills = &snap.skills;
    let depth = skills.get(Skill::Depth) as i64;
    let mut value = 0i64;

    value += (skills.get(Skill::FoodCount).min(10)) as i64 * 2_000;
    value += (skills.get(Skill::FuelCount).min(10)) as i64 * 1_500;
    value += (skills.get(Skill::HealCount).min(8)) as i64 * 3_000;
    if depth > 0 {
        value += (skills.get(Skill::RecallCount).min(3)) as i64 * 4_000;
    }
    if skills.get(Skill::FoodCount) == 0 {
        value -= 15_000;
    }
    if skills.get(Skill::FuelCount) == 0 && skills.get(Skill::LightRadius) <= 1 {
        value -= 10_000;
    }

    // Cash reserve matters, with hard diminishing returns.
    value += snap.gold.min(100_000) / 20;

    value
}

/// Reduce a snapshot to a single comparable utility number.
///
/// Total over any input: empty slots, zero-quantity stacks, and
/// unidentified items all score their known parts only.
pub fn power(snap: &WorldSnapshot, cfg: &PilotConfig) -> i64 {
    let mut value = offense(snap, cfg) + defense(snap, cfg) + supplies(snap);
    for expr in &cfg.power_bonus {
        value += expr.eval(&snap.skills);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::item::{Item, ItemFlags, ItemKind};
    use crate::snapshot::sv;

    fn base_snapshot() -> WorldSnapshot {
        let mut snap = WorldSnapshot::new();
        snap.player.cur_hp = 30;
        snap.player.max_hp = 30;
        snap.player.level = 5;
        snap.notice();
        snap
    }

    #[test]
    fn power_is_deterministic() {
        let snap = base_snapshot();
        let cfg = PilotConfig::default();
        assert_eq!(power(&snap, &cfg), power(&snap, &cfg));
    }

    #[test]
    fn power_does_not_mutate_snapshot() {
        let snap = base_snapshot();
        let before = snap.clone();
        let _ = power(&snap, &PilotConfig::default());
        assert_eq!(snap, before);
    }

    #[test]
    fn weapon_raises_power() {
        let cfg = PilotConfig::default();
        let mut snap = base_snapshot();
        let bare = power(&snap, &cfg);
        let mut sword = Item::of(ItemKind::new(Tval::Weapon, 1), 1).identified();
        sword.damage_dice = 2;
        sword.damage_sides = 6;
        snap.equipment.set(Slot::Weapon, Some(sword));
        snap.notice();
        assert!(power(&snap, &cfg) > bare);
    }

    #[test]
    fn resistance_raises_power() {
        let cfg = PilotConfig::default();
        let mut snap = base_snapshot();
        let bare = power(&snap, &cfg);
        let ring = Item::of(ItemKind::new(Tval::Ring, 2), 1)
            .identified()
            .with_flags(ItemFlags::RES_POIS);
        snap.equipment.set(Slot::RingLeft, Some(ring));
        snap.notice();
        assert!(power(&snap, &cfg) > bare);
    }

    #[test]
    fn cursed_gear_lowers_power() {
        let cfg = PilotConfig::default();
        let mut snap = base_snapshot();
        let clean = power(&snap, &cfg);
        let mut helm = Item::of(ItemKind::new(Tval::Helm, 1), 1).identified();
        helm.cursed = true;
        snap.equipment.set(Slot::Helm, Some(helm));
        snap.notice();
        assert!(power(&snap, &cfg) < clean);
    }

    #[test]
    fn total_on_empty_everything() {
        let mut snap = WorldSnapshot::new();
        snap.notice();
        // Starving, dark, naked: should be a finite (bad) number, not a panic.
        let _ = power(&snap, &PilotConfig::default());
    }

    #[test]
    fn heal_potions_capped() {
        let cfg = PilotConfig::default();
        let mut snap = base_snapshot();
        snap.inventory[0] = Item::of(ItemKind::new(Tval::Potion, sv::POTION_HEAL), 8);
        snap.notice();
        let at_cap = power(&snap, &cfg);
        snap.inventory[0].quantity = 30;
        snap.notice();
        assert_eq!(power(&snap, &cfg), at_cap);
    }

    #[test]
    fn formula_bonus_applies() {
        let mut cfg = PilotConfig::default();
        let snap = base_snapshot();
        let base = power(&snap, &cfg);
        cfg.power_bonus.push("value(MaxHp) * 10".parse().unwrap());
        assert_eq!(power(&snap, &cfg), base + 300);
    }
}
