//! Hypothetical mutation sandbox.
//!
//! Every "should I buy/sell/wear/stockpile X" question runs through here:
//! capture the slots the trial is allowed to touch, apply one atomic change,
//! re-derive skills, re-evaluate power, then put everything back exactly as
//! it was. Callers rely on the world being pristine after every call, on
//! every path.
//!
//! Scopes follow a strict stack discipline; debug builds reject a nested
//! scope that overlaps an active one.

#[cfg(debug_assertions)]
use std::cell::RefCell;

use thiserror::Error;

use crate::config::PilotConfig;
use crate::power::{home_power, power};
use crate::snapshot::item::Item;
use crate::snapshot::skills::SkillTable;
use crate::snapshot::{Equipment, WorldSnapshot};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationError {
    /// Source or destination capacity would be exceeded, or the trial is
    /// otherwise impossible. Treated by callers as "no improvement found".
    #[error("mutation infeasible")]
    Infeasible,
}

/// Which containers a trial mutation may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scope {
    pub inventory: bool,
    pub equipment: bool,
    /// At most one shop (or the home) per trial.
    pub shop: Option<usize>,
}

impl Scope {
    pub const INVENTORY: Scope = Scope {
        inventory: true,
        equipment: false,
        shop: None,
    };

    pub const GEAR: Scope = Scope {
        inventory: true,
        equipment: true,
        shop: None,
    };

    pub fn with_shop(shop: usize) -> Scope {
        Scope {
            inventory: true,
            equipment: true,
            shop: Some(shop),
        }
    }

    fn overlaps(&self, other: &Scope) -> bool {
        (self.inventory && other.inventory)
            || (self.equipment && other.equipment)
            || (self.shop.is_some() && self.shop == other.shop)
    }
}

#[cfg(debug_assertions)]
thread_local! {
    static ACTIVE_SCOPES: RefCell<Vec<Scope>> = const { RefCell::new(Vec::new()) };
}

/// Saved copies of everything inside a scope.
struct Saved {
    inventory: Option<Vec<Item>>,
    equipment: Option<Equipment>,
    shop_ware: Option<(usize, Vec<Item>)>,
    skills: SkillTable,
    /// Gold always rides along; buy/sell trials adjust it.
    gold: i64,
}

impl Saved {
    fn capture(snap: &WorldSnapshot, scope: Scope) -> Saved {
        #[cfg(debug_assertions)]
        ACTIVE_SCOPES.with(|stack| {
            let stack = stack.borrow();
            debug_assert!(
                !stack.iter().any(|active| active.overlaps(&scope)),
                "nested sandbox scopes must not overlap"
            );
        });
        #[cfg(debug_assertions)]
        ACTIVE_SCOPES.with(|stack| stack.borrow_mut().push(scope));

        Saved {
            inventory: scope.inventory.then(|| snap.inventory.clone()),
            equipment: scope.equipment.then(|| snap.equipment.clone()),
            shop_ware: scope.shop.map(|s| (s, snap.shops[s].ware.clone())),
            skills: snap.skills.clone(),
            gold: snap.gold,
        }
    }

    fn restore(self, snap: &mut WorldSnapshot) {
        if let Some(inventory) = self.inventory {
            snap.inventory = inventory;
        }
        if let Some(equipment) = self.equipment {
            snap.equipment = equipment;
        }
        if let Some((idx, ware)) = self.shop_ware {
            snap.shops[idx].ware = ware;
        }
        snap.skills = self.skills;
        snap.gold = self.gold;

        #[cfg(debug_assertions)]
        ACTIVE_SCOPES.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Restores the captured state when dropped, unwinding included.
struct Restore<'a> {
    snap: &'a mut WorldSnapshot,
    saved: Option<Saved>,
}

impl Drop for Restore<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            saved.restore(self.snap);
        }
    }
}

/// Powers measured around a trial mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialPowers {
    pub power_before: i64,
    pub power_after: i64,
    pub home_before: i64,
    pub home_after: i64,
}

impl TrialPowers {
    pub fn power_gain(&self) -> i64 {
        self.power_after - self.power_before
    }

    pub fn home_gain(&self) -> i64 {
        self.home_after - self.home_before
    }
}

/// Run one trial mutation and report power before and after.
///
/// The snapshot is restored to its exact pre-call state before this returns,
/// whether the mutation succeeds, reports infeasible, or the recompute is
/// never reached. An infeasible mutation yields the baseline power on both
/// sides, which callers read as "no improvement".
pub fn with_mutation<F>(
    snap: &mut WorldSnapshot,
    cfg: &PilotConfig,
    scope: Scope,
    mutate: F,
) -> TrialPowers
where
    F: FnOnce(&mut WorldSnapshot) -> Result<(), MutationError>,
{
    let power_before = power(snap, cfg);
    let home_before = home_power(snap);

    let saved = Saved::capture(snap, scope);
    let mut guard = Restore {
        snap,
        saved: Some(saved),
    };

    let result = mutate(&mut *guard.snap);
    let (power_after, home_after) = match result {
        Ok(()) => {
            guard.snap.notice();
            (power(&*guard.snap, cfg), home_power(&*guard.snap))
        }
        Err(MutationError::Infeasible) => (power_before, home_before),
    };

    drop(guard);

    TrialPowers {
        power_before,
        power_after,
        home_before,
        home_after,
    }
}

/// Move one copy of an inventory item into a shop/home slot. The standard
/// stockpile/sell trial body.
pub fn move_to_shop(
    snap: &mut WorldSnapshot,
    inv_idx: usize,
    shop_idx: usize,
) -> Result<(), MutationError> {
    let item = snap
        .inventory
        .get(inv_idx)
        .filter(|i| !i.is_empty())
        .cloned()
        .ok_or(MutationError::Infeasible)?;

    let slot = {
        let shop = &snap.shops[shop_idx];
        shop.landing_slot(&item).ok_or(MutationError::Infeasible)?
    };

    let one = snap.inventory[inv_idx]
        .split(1)
        .ok_or(MutationError::Infeasible)?;

    let ware = &mut snap.shops[shop_idx].ware[slot];
    if ware.is_empty() {
        *ware = one;
    } else if ware.can_merge(&one) {
        ware.merge(one);
    } else {
        return Err(MutationError::Infeasible);
    }
    Ok(())
}

/// Move one copy of a shop ware into the pack. The standard buy/grab trial.
pub fn take_from_shop(
    snap: &mut WorldSnapshot,
    shop_idx: usize,
    ware_idx: usize,
) -> Result<(), MutationError> {
    let one = {
        let ware = snap.shops[shop_idx]
            .ware
            .get_mut(ware_idx)
            .filter(|w| !w.is_empty())
            .ok_or(MutationError::Infeasible)?;
        ware.split(1).ok_or(MutationError::Infeasible)?
    };

    if let Some(idx) = snap.inventory.iter().position(|i| i.can_merge(&one)) {
        snap.inventory[idx].merge(one);
        return Ok(());
    }
    let empty = snap
        .first_empty_slot()
        .ok_or(MutationError::Infeasible)?;
    snap.inventory[empty] = one;
    Ok(())
}

/// Swap an inventory item into an equipment slot (the displaced piece, if
/// any, lands in the vacated inventory slot).
pub fn wear_from_inventory(
    snap: &mut WorldSnapshot,
    inv_idx: usize,
    slot: crate::snapshot::Slot,
) -> Result<(), MutationError> {
    let item = snap
        .inventory
        .get(inv_idx)
        .filter(|i| !i.is_empty())
        .cloned()
        .ok_or(MutationError::Infeasible)?;
    if !item.kind.tval.is_wearable() {
        return Err(MutationError::Infeasible);
    }
    let one = snap.inventory[inv_idx]
        .split(1)
        .ok_or(MutationError::Infeasible)?;
    let displaced = snap.equipment.set(slot, Some(one));
    if let Some(old) = displaced {
        if snap.inventory[inv_idx].is_empty() {
            snap.inventory[inv_idx] = old;
        } else if let Some(empty) = snap.first_empty_slot() {
            snap.inventory[empty] = old;
        } else {
            return Err(MutationError::Infeasible);
        }
    }
    Ok(())
}
