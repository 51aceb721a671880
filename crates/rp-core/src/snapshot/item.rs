//! Item records and stacking rules.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::consts::MAX_STACK;

/// Broad item category, the first half of an item's kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Tval {
    /// Empty slot marker
    #[default]
    None = 0,
    Food,
    Flask,
    Light,
    Potion,
    Scroll,
    Wand,
    Staff,
    Rod,
    Ring,
    Amulet,
    Weapon,
    Digger,
    Bow,
    Ammo,
    Body,
    Shield,
    Helm,
    Gloves,
    Boots,
    Cloak,
    Book,
    Junk,
}

impl Tval {
    /// Kinds whose charges live in a shared pool across a stack.
    pub fn pools_charges(self) -> bool {
        matches!(self, Tval::Wand | Tval::Staff)
    }

    /// Kinds worn in an equipment slot.
    pub fn is_wearable(self) -> bool {
        matches!(
            self,
            Tval::Light
                | Tval::Ring
                | Tval::Amulet
                | Tval::Weapon
                | Tval::Digger
                | Tval::Bow
                | Tval::Body
                | Tval::Shield
                | Tval::Helm
                | Tval::Gloves
                | Tval::Boots
                | Tval::Cloak
        )
    }

    /// Kinds that count as armour for swap-reserve purposes.
    pub fn is_armour(self) -> bool {
        matches!(
            self,
            Tval::Body | Tval::Shield | Tval::Helm | Tval::Gloves | Tval::Boots | Tval::Cloak
        )
    }
}

/// Full item kind: category plus subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ItemKind {
    pub tval: Tval,
    pub sval: u8,
}

impl ItemKind {
    pub const fn new(tval: Tval, sval: u8) -> Self {
        ItemKind { tval, sval }
    }
}

bitflags! {
    /// Property flags an item can grant while worn or carried.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct ItemFlags: u32 {
        const RES_FIRE      = 0x0000_0001;
        const RES_COLD      = 0x0000_0002;
        const RES_ELEC      = 0x0000_0004;
        const RES_ACID      = 0x0000_0008;
        const RES_POIS      = 0x0000_0010;
        const FREE_ACTION   = 0x0000_0020;
        const SEE_INVIS     = 0x0000_0040;
        const SUST_STR      = 0x0000_0080;
        const SUST_INT      = 0x0000_0100;
        const SUST_WIS      = 0x0000_0200;
        const SUST_DEX      = 0x0000_0400;
        const SUST_CON      = 0x0000_0800;
        const SPEED         = 0x0000_1000;
        const STEALTH       = 0x0000_2000;
        const REGEN         = 0x0000_4000;
        const TELEPATHY     = 0x0000_8000;
        const LIGHT         = 0x0001_0000;
        const SLOW_DIGEST   = 0x0002_0000;
        const AGGRAVATE     = 0x0004_0000;
        const DRAIN_EXP     = 0x0008_0000;
    }
}

/// One item record, as known to the pilot.
///
/// Identification is two-staged: `aware` means the kind's base behavior is
/// known, `ident` means the bonuses on this particular copy are known.
/// Unidentified bonuses are treated as zero everywhere they are scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    pub quantity: u16,
    pub to_hit: i16,
    pub to_dam: i16,
    pub to_ac: i16,
    pub damage_dice: u8,
    pub damage_sides: u8,
    /// Pval: light radius, speed bonus, or pooled charges depending on kind.
    pub pval: i32,
    pub weight: u32,
    /// Base market value of a single copy.
    pub value: i64,
    pub flags: ItemFlags,
    pub aware: bool,
    pub ident: bool,
    pub artifact: bool,
    pub ego: bool,
    pub cursed: bool,
    /// Recharge cooldown (rods); stacks only merge at zero.
    pub timeout: u16,
    pub inscription: Option<String>,
}

impl Default for Item {
    fn default() -> Self {
        Item {
            kind: ItemKind::default(),
            quantity: 0,
            to_hit: 0,
            to_dam: 0,
            to_ac: 0,
            damage_dice: 0,
            damage_sides: 0,
            pval: 0,
            weight: 0,
            value: 0,
            flags: ItemFlags::empty(),
            aware: false,
            ident: false,
            artifact: false,
            ego: false,
            cursed: false,
            timeout: 0,
            inscription: None,
        }
    }
}

impl Item {
    /// An empty slot.
    pub fn empty() -> Self {
        Item::default()
    }

    pub fn is_empty(&self) -> bool {
        self.quantity == 0 || self.kind.tval == Tval::None
    }

    /// Known per-copy value, zero for unpriced unknowns.
    pub fn known_value(&self) -> i64 {
        if self.aware { self.value } else { 0 }
    }

    /// Per-copy charge share for pooled-charge kinds.
    pub fn charge_each(&self) -> i32 {
        if self.kind.tval.pools_charges() && self.quantity > 0 {
            self.pval / self.quantity as i32
        } else {
            0
        }
    }

    /// Stack-merge equality: same kind, same known bonuses, same
    /// identification state, same inscription, neither an artifact, and the
    /// combined quantity under the slot limit.
    pub fn can_merge(&self, other: &Item) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.kind == other.kind
            && self.to_hit == other.to_hit
            && self.to_dam == other.to_dam
            && self.to_ac == other.to_ac
            && self.aware == other.aware
            && self.ident == other.ident
            && self.inscription == other.inscription
            && !self.artifact
            && !other.artifact
            && self.timeout == 0
            && other.timeout == 0
            && self.quantity + other.quantity <= MAX_STACK
    }

    /// Merge `other` into this stack. Caller must have checked `can_merge`.
    /// Pooled charges are summed.
    pub fn merge(&mut self, other: Item) {
        debug_assert!(self.can_merge(&other));
        self.quantity += other.quantity;
        if self.kind.tval.pools_charges() {
            self.pval += other.pval;
        }
    }

    /// Split `count` copies off this stack, carrying a proportional share of
    /// any pooled charges. Returns `None` when the stack is too small.
    pub fn split(&mut self, count: u16) -> Option<Item> {
        if count == 0 || count > self.quantity {
            return None;
        }
        let mut off = self.clone();
        let share = self.charge_each() * count as i32;
        off.quantity = count;
        self.quantity -= count;
        if self.kind.tval.pools_charges() {
            off.pval = share;
            self.pval -= share;
        }
        if self.quantity == 0 {
            *self = Item::empty();
        }
        Some(off)
    }

    /// Expected damage of one melee blow with this item, scaled by 20 to
    /// stay in integers (dice average times to-dam reward happens in power).
    pub fn blow_damage(&self) -> i64 {
        self.damage_dice as i64 * self.damage_sides as i64 * 20
    }
}

/// Builder-flavored constructors used all over the planner and tests.
impl Item {
    pub fn of(kind: ItemKind, quantity: u16) -> Self {
        Item {
            kind,
            quantity,
            aware: true,
            ..Item::default()
        }
    }

    pub fn with_value(mut self, value: i64) -> Self {
        self.value = value;
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_flags(mut self, flags: ItemFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn identified(mut self) -> Self {
        self.aware = true;
        self.ident = true;
        self
    }
}
