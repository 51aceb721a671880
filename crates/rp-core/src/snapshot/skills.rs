//! Derived skill table.
//!
//! Every entry is recomputed from base stats plus equipment each time
//! `WorldSnapshot::notice` runs; nothing here persists across turns.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

/// Identifiers for every derived number the evaluators read.
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
pub enum Skill {
    CurHp,
    MaxHp,
    CurSp,
    MaxSp,
    Depth,
    MaxDepth,
    Level,
    MaxLevel,
    Speed,
    Blows,
    Shots,
    ToHit,
    ToDam,
    ArmorClass,
    LightRadius,
    Stealth,
    AmmoSides,
    AmmoPower,
    FoodCount,
    FuelCount,
    HealCount,
    RecallCount,
    ResFire,
    ResCold,
    ResElec,
    ResAcid,
    ResPois,
    FreeAction,
    SeeInvis,
    Telepathy,
    Regen,
    SustainCount,
    IsCut,
    IsPoisoned,
    IsWeak,
    IsHungry,
    IsBlind,
    IsConfused,
    Encumbered,
    CursedGear,
    Aggravates,
}

/// Dense skill table, indexed by [`Skill`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTable {
    values: Vec<i32>,
}

impl Default for SkillTable {
    fn default() -> Self {
        SkillTable {
            values: vec![0; <Skill as EnumCount>::COUNT],
        }
    }
}

impl SkillTable {
    pub fn get(&self, skill: Skill) -> i32 {
        self.values[skill as usize]
    }

    pub fn set(&mut self, skill: Skill, value: i32) {
        self.values[skill as usize] = value;
    }

    pub fn add(&mut self, skill: Skill, delta: i32) {
        self.values[skill as usize] += delta;
    }

    /// True when the flag-like skill is nonzero.
    pub fn has(&self, skill: Skill) -> bool {
        self.get(skill) != 0
    }

    pub fn clear(&mut self) {
        self.values.fill(0);
    }
}
