//! Shops and the home stockpile.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::item::{Item, Tval};
use crate::consts::{HOME, SHOP_COUNT, WARE_SLOTS};

/// What a real shop deals in. Decides which categories it will buy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter,
)]
pub enum ShopKind {
    General,
    Armoury,
    Weaponsmith,
    Temple,
    Alchemist,
    Magic,
    /// The player stockpile. Takes anything, pays nothing.
    Home,
}

impl ShopKind {
    /// Shop kind at a given shop index.
    pub fn at(index: usize) -> ShopKind {
        match index {
            0 => ShopKind::General,
            1 => ShopKind::Armoury,
            2 => ShopKind::Weaponsmith,
            3 => ShopKind::Temple,
            4 => ShopKind::Alchemist,
            5 => ShopKind::Magic,
            _ => ShopKind::Home,
        }
    }

    /// Whether this shop buys items of the given category.
    pub fn buys(self, tval: Tval) -> bool {
        match self {
            ShopKind::General => matches!(
                tval,
                Tval::Food | Tval::Flask | Tval::Light | Tval::Ammo | Tval::Junk
            ),
            ShopKind::Armoury => tval.is_armour(),
            ShopKind::Weaponsmith => {
                matches!(tval, Tval::Weapon | Tval::Digger | Tval::Bow | Tval::Ammo)
            }
            ShopKind::Temple => matches!(tval, Tval::Potion | Tval::Scroll | Tval::Book),
            ShopKind::Alchemist => matches!(tval, Tval::Potion | Tval::Scroll),
            ShopKind::Magic => matches!(
                tval,
                Tval::Wand | Tval::Staff | Tval::Rod | Tval::Ring | Tval::Amulet | Tval::Book
            ),
            ShopKind::Home => true,
        }
    }
}

/// One shop: a fixed run of ware slots. Empty slots hold `Item::empty()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub kind: ShopKind,
    pub ware: Vec<Item>,
}

impl Shop {
    pub fn new(kind: ShopKind) -> Self {
        Shop {
            kind,
            ware: vec![Item::empty(); WARE_SLOTS],
        }
    }

    /// The full shop row: all real shops followed by the home.
    pub fn town() -> Vec<Shop> {
        (0..=SHOP_COUNT).map(|i| Shop::new(ShopKind::at(i))).collect()
    }

    pub fn is_home(&self) -> bool {
        self.kind == ShopKind::Home
    }

    /// Index of the first empty ware slot, if any.
    pub fn first_empty(&self) -> Option<usize> {
        self.ware.iter().position(Item::is_empty)
    }

    pub fn is_full(&self) -> bool {
        self.first_empty().is_none()
    }

    /// Slot this item would land in: an existing mergeable stack first,
    /// otherwise the first empty slot.
    pub fn landing_slot(&self, item: &Item) -> Option<usize> {
        self.ware
            .iter()
            .position(|w| w.can_merge(item))
            .or_else(|| self.first_empty())
    }

    /// Price this shop asks for one copy of a ware (home wares are free).
    pub fn asking_price(&self, ware: &Item) -> i64 {
        if self.is_home() { 0 } else { ware.known_value() }
    }

    /// What this shop pays for one copy (home pays nothing).
    pub fn offer_price(&self, item: &Item) -> i64 {
        if self.is_home() || !self.kind.buys(item.kind.tval) {
            0
        } else {
            // Shops buy at a margin under market value.
            (item.known_value() * 3) / 4
        }
    }
}

/// Convenience accessors over the full shop row.
pub trait ShopRow {
    fn home(&self) -> &Shop;
    fn home_mut(&mut self) -> &mut Shop;
}

impl ShopRow for Vec<Shop> {
    fn home(&self) -> &Shop {
        &self[HOME]
    }

    fn home_mut(&mut self) -> &mut Shop {
        &mut self[HOME]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::item::ItemKind;

    #[test]
    fn town_has_home_last() {
        let shops = Shop::town();
        assert_eq!(shops.len(), SHOP_COUNT + 1);
        assert!(shops[HOME].is_home());
        assert!(!shops[0].is_home());
    }

    #[test]
    fn landing_slot_prefers_merge() {
        let mut shop = Shop::new(ShopKind::General);
        let food = Item::of(ItemKind::new(Tval::Food, 1), 2).with_value(3);
        shop.ware[5] = food.clone();
        assert_eq!(shop.landing_slot(&food), Some(5));
        let lamp = Item::of(ItemKind::new(Tval::Light, 1), 1).with_value(100);
        assert_eq!(shop.landing_slot(&lamp), Some(0));
    }

    #[test]
    fn home_pays_and_charges_nothing() {
        let home = Shop::new(ShopKind::Home);
        let food = Item::of(ItemKind::new(Tval::Food, 1), 1).with_value(40);
        assert_eq!(home.asking_price(&food), 0);
        assert_eq!(home.offer_price(&food), 0);
    }

    #[test]
    fn armoury_rejects_potions() {
        let shop = Shop::new(ShopKind::Armoury);
        let potion = Item::of(ItemKind::new(Tval::Potion, 1), 1).with_value(40);
        assert_eq!(shop.offer_price(&potion), 0);
        let mail = Item::of(ItemKind::new(Tval::Body, 1), 1).with_value(100);
        assert_eq!(shop.offer_price(&mail), 75);
    }
}
