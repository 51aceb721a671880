//! The world snapshot: everything the pilot currently knows.
//!
//! Sensing collaborators overwrite these fields between turns; the decision
//! core reads them, and only the sandbox may mutate the item containers
//! (restoring them before anyone else looks).

pub mod item;
pub mod shop;
pub mod skills;
pub mod terrain;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

use crate::consts::PACK_SLOTS;
use item::{Item, ItemFlags, Tval};
use shop::Shop;
use skills::{Skill, SkillTable};
use terrain::{LevelMemory, Pos};

/// Named equipment slots.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumCount,
)]
#[repr(usize)]
pub enum Slot {
    Weapon,
    Bow,
    RingLeft,
    RingRight,
    Amulet,
    Light,
    Body,
    Cloak,
    Shield,
    Helm,
    Gloves,
    Boots,
}

impl Slot {
    /// Slots an item of this category may occupy. Rings get the left hand
    /// here; the right hand is tried explicitly where it matters.
    pub fn for_tval(tval: Tval) -> Option<Slot> {
        match tval {
            Tval::Weapon | Tval::Digger => Some(Slot::Weapon),
            Tval::Bow => Some(Slot::Bow),
            Tval::Ring => Some(Slot::RingLeft),
            Tval::Amulet => Some(Slot::Amulet),
            Tval::Light => Some(Slot::Light),
            Tval::Body => Some(Slot::Body),
            Tval::Cloak => Some(Slot::Cloak),
            Tval::Shield => Some(Slot::Shield),
            Tval::Helm => Some(Slot::Helm),
            Tval::Gloves => Some(Slot::Gloves),
            Tval::Boots => Some(Slot::Boots),
            _ => None,
        }
    }
}

/// Worn equipment: one optional item per named slot, plus the two reserve
/// ("swap") pieces held outside normal slot accounting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    items: Vec<Option<Item>>,
    pub swap_weapon: Option<Item>,
    pub swap_armour: Option<Item>,
}

impl Default for Equipment {
    fn default() -> Self {
        Equipment::new()
    }
}

impl Equipment {
    pub fn new() -> Self {
        Equipment {
            items: vec![None; <Slot as EnumCount>::COUNT],
            swap_weapon: None,
            swap_armour: None,
        }
    }

    pub fn get(&self, slot: Slot) -> Option<&Item> {
        self.items.get(slot as usize).and_then(|s| s.as_ref())
    }

    pub fn set(&mut self, slot: Slot, item: Option<Item>) -> Option<Item> {
        std::mem::replace(&mut self.items[slot as usize], item)
    }

    pub fn worn(&self) -> impl Iterator<Item = (Slot, &Item)> {
        Slot::iter().filter_map(move |slot| self.get(slot).map(|item| (slot, item)))
    }

    pub fn total_weight(&self) -> u32 {
        self.worn().map(|(_, i)| i.weight * i.quantity as u32).sum()
    }
}

/// Base player facts sensed directly from the host (not derived).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerBase {
    pub cur_hp: i32,
    pub max_hp: i32,
    pub cur_sp: i32,
    pub max_sp: i32,
    pub level: i32,
    pub max_level: i32,
    pub depth: i32,
    pub max_depth: i32,
    pub base_speed: i32,
    pub base_to_hit: i32,
    pub base_to_dam: i32,
    pub base_blows: i32,
    pub base_shots: i32,
    pub base_stealth: i32,
    pub carry_capacity: u32,
    pub is_cut: bool,
    pub is_poisoned: bool,
    pub is_weak: bool,
    pub is_hungry: bool,
    pub is_blind: bool,
    pub is_confused: bool,
}

/// Which cached views are due a refresh next turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshFlags {
    pub equipment: bool,
    pub inventory: bool,
    pub spells: bool,
    pub panel: bool,
}

impl Default for RefreshFlags {
    fn default() -> Self {
        // Everything is stale at startup.
        RefreshFlags {
            equipment: true,
            inventory: true,
            spells: true,
            panel: true,
        }
    }
}

impl RefreshFlags {
    /// Rearm every flag for the following turn.
    pub fn rearm(&mut self) {
        *self = RefreshFlags::default();
    }
}

/// The full world snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub player: PlayerBase,
    pub pos: Pos,
    pub gold: i64,
    /// Carried pack. Fixed capacity, empty slots at the tail.
    pub inventory: Vec<Item>,
    pub equipment: Equipment,
    /// All real shops plus the home, only meaningful in town.
    pub shops: Vec<Shop>,
    /// Shop index when standing inside one.
    pub in_shop: Option<usize>,
    pub level: LevelMemory,
    pub skills: SkillTable,
    pub refresh: RefreshFlags,
}

impl Default for WorldSnapshot {
    fn default() -> Self {
        WorldSnapshot::new()
    }
}

impl WorldSnapshot {
    pub fn new() -> Self {
        WorldSnapshot {
            player: PlayerBase::default(),
            pos: Pos::default(),
            gold: 0,
            inventory: vec![Item::empty(); PACK_SLOTS],
            equipment: Equipment::new(),
            shops: Shop::town(),
            in_shop: None,
            level: LevelMemory::default(),
            skills: SkillTable::default(),
            refresh: RefreshFlags::default(),
        }
    }

    pub fn in_town(&self) -> bool {
        self.player.depth == 0
    }

    /// Index of the first empty pack slot.
    pub fn first_empty_slot(&self) -> Option<usize> {
        self.inventory.iter().position(Item::is_empty)
    }

    pub fn pack_full(&self) -> bool {
        self.first_empty_slot().is_none()
    }

    /// Count of carried copies matching a predicate.
    pub fn count_where(&self, pred: impl Fn(&Item) -> bool) -> i32 {
        self.inventory
            .iter()
            .filter(|i| !i.is_empty() && pred(i))
            .map(|i| i.quantity as i32)
            .sum()
    }

    /// Recompute the derived skill table from base stats and equipment.
    ///
    /// Total over any input: empty slots and unidentified items contribute
    /// their known parts only.
    pub fn notice(&mut self) {
        let mut t = SkillTable::default();
        let p = &self.player;

        t.set(Skill::CurHp, p.cur_hp);
        t.set(Skill::MaxHp, p.max_hp);
        t.set(Skill::CurSp, p.cur_sp);
        t.set(Skill::MaxSp, p.max_sp);
        t.set(Skill::Level, p.level);
        t.set(Skill::MaxLevel, p.max_level);
        t.set(Skill::Depth, p.depth);
        t.set(Skill::MaxDepth, p.max_depth);
        t.set(Skill::Speed, p.base_speed);
        t.set(Skill::Blows, p.base_blows.max(1));
        t.set(Skill::Shots, p.base_shots.max(1));
        t.set(Skill::ToHit, p.base_to_hit);
        t.set(Skill::ToDam, p.base_to_dam);
        t.set(Skill::Stealth, p.base_stealth);

        t.set(Skill::IsCut, p.is_cut as i32);
        t.set(Skill::IsPoisoned, p.is_poisoned as i32);
        t.set(Skill::IsWeak, p.is_weak as i32);
        t.set(Skill::IsHungry, p.is_hungry as i32);
        t.set(Skill::IsBlind, p.is_blind as i32);
        t.set(Skill::IsConfused, p.is_confused as i32);

        // Equipment contributions. Unidentified bonuses count as zero.
        for (slot, item) in self.equipment.worn() {
            if item.ident {
                t.add(Skill::ArmorClass, item.to_ac as i32);
                if !matches!(slot, Slot::Weapon | Slot::Bow) {
                    t.add(Skill::ToHit, item.to_hit as i32);
                    t.add(Skill::ToDam, item.to_dam as i32);
                }
            }
            let flags = if item.ident { item.flags } else { ItemFlags::empty() };
            if flags.contains(ItemFlags::RES_FIRE) {
                t.set(Skill::ResFire, 1);
            }
            if flags.contains(ItemFlags::RES_COLD) {
                t.set(Skill::ResCold, 1);
            }
            if flags.contains(ItemFlags::RES_ELEC) {
                t.set(Skill::ResElec, 1);
            }
            if flags.contains(ItemFlags::RES_ACID) {
                t.set(Skill::ResAcid, 1);
            }
            if flags.contains(ItemFlags::RES_POIS) {
                t.set(Skill::ResPois, 1);
            }
            if flags.contains(ItemFlags::FREE_ACTION) {
                t.set(Skill::FreeAction, 1);
            }
            if flags.contains(ItemFlags::SEE_INVIS) {
                t.set(Skill::SeeInvis, 1);
            }
            if flags.contains(ItemFlags::TELEPATHY) {
                t.set(Skill::Telepathy, 1);
            }
            if flags.contains(ItemFlags::REGEN) {
                t.set(Skill::Regen, 1);
            }
            if flags.contains(ItemFlags::SPEED) {
                t.add(Skill::Speed, item.pval);
            }
            if flags.contains(ItemFlags::STEALTH) {
                t.add(Skill::Stealth, item.pval);
            }
            if flags.contains(ItemFlags::AGGRAVATE) {
                t.set(Skill::Aggravates, 1);
            }
            let sustains = ItemFlags::SUST_STR
                | ItemFlags::SUST_INT
                | ItemFlags::SUST_WIS
                | ItemFlags::SUST_DEX
                | ItemFlags::SUST_CON;
            t.add(
                Skill::SustainCount,
                (flags & sustains).bits().count_ones() as i32,
            );
            if item.cursed {
                t.add(Skill::CursedGear, 1);
            }
        }

        // Light radius from the light slot plus any glowing gear.
        let mut light = 0;
        if let Some(lamp) = self.equipment.get(Slot::Light) {
            light += lamp.pval.max(0);
        }
        for (_, item) in self.equipment.worn() {
            if item.ident && item.flags.contains(ItemFlags::LIGHT) {
                light += 1;
            }
        }
        t.set(Skill::LightRadius, light);

        // Launcher-dependent ammo profile.
        if let Some(bow) = self.equipment.get(Slot::Bow) {
            t.set(Skill::AmmoSides, bow.damage_sides.max(1) as i32);
            t.set(Skill::AmmoPower, (bow.pval).max(1));
        }

        // Consumable sufficiency, counted from the pack.
        t.set(
            Skill::FoodCount,
            self.count_where(|i| i.kind.tval == Tval::Food),
        );
        t.set(
            Skill::FuelCount,
            self.count_where(|i| i.kind.tval == Tval::Flask),
        );
        t.set(
            Skill::HealCount,
            self.count_where(|i| i.kind.tval == Tval::Potion && i.kind.sval == sv::POTION_HEAL),
        );
        t.set(
            Skill::RecallCount,
            self.count_where(|i| i.kind.tval == Tval::Scroll && i.kind.sval == sv::SCROLL_RECALL),
        );

        // Encumbrance: carried weight against capacity.
        let carried: u32 = self
            .inventory
            .iter()
            .map(|i| i.weight * i.quantity as u32)
            .sum::<u32>()
            + self.equipment.total_weight();
        if self.player.carry_capacity > 0 && carried > self.player.carry_capacity {
            t.set(Skill::Encumbered, 1);
        }

        self.skills = t;
    }
}

/// Subtype identifiers with engine-level meaning.
pub mod sv {
    pub const POTION_HEAL: u8 = 1;
    pub const POTION_CURE_POISON: u8 = 2;
    pub const POTION_CURE_WOUNDS: u8 = 3;
    pub const SCROLL_RECALL: u8 = 1;
    pub const SCROLL_TELEPORT: u8 = 2;
    pub const FOOD_RATION: u8 = 1;
    pub const LIGHT_TORCH: u8 = 1;
    pub const LIGHT_LANTERN: u8 = 2;
}
