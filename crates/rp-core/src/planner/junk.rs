//! Useless-item detection.
//!
//! A carried item is worth selling (or dropping) when removing one copy
//! costs no power. The one-at-a-time removal trial is the authority here;
//! category heuristics only pre-filter.

use crate::config::PilotConfig;
use crate::sandbox::{self, MutationError, Scope};
use crate::snapshot::item::{Item, Tval};
use crate::snapshot::{sv, WorldSnapshot};

/// Copies of a consumable the pilot keeps regardless of what power says.
/// The evaluator caps rewards, so the margin above the cap reads as free
/// to sell; this floor stops the planner from trading away the reserve.
pub fn min_quantity(item: &Item) -> u16 {
    match item.kind.tval {
        Tval::Food => 5,
        Tval::Flask => 5,
        Tval::Potion if item.kind.sval == sv::POTION_HEAL => 4,
        Tval::Scroll if item.kind.sval == sv::SCROLL_RECALL => 2,
        Tval::Ammo => 10,
        _ => 0,
    }
}

/// Items never offered for sale: reserve swap gear and the worn light.
fn is_reserved(snap: &WorldSnapshot, cfg: &PilotConfig, item: &Item) -> bool {
    if !cfg.uses_swaps {
        return false;
    }
    let matches_swap = |swap: &Option<Item>| {
        swap.as_ref()
            .is_some_and(|s| s.kind == item.kind && s.to_hit == item.to_hit && s.to_dam == item.to_dam)
    };
    matches_swap(&snap.equipment.swap_weapon) || matches_swap(&snap.equipment.swap_armour)
}

/// True when one copy of `inv_idx` can go without losing any power.
pub fn copy_is_expendable(snap: &mut WorldSnapshot, cfg: &PilotConfig, inv_idx: usize) -> bool {
    let outcome = sandbox::with_mutation(snap, cfg, Scope::INVENTORY, |s| {
        let item = s
            .inventory
            .get_mut(inv_idx)
            .filter(|i| !i.is_empty())
            .ok_or(MutationError::Infeasible)?;
        item.split(1).map(drop).ok_or(MutationError::Infeasible)
    });
    outcome.power_gain() >= 0
}

/// Pack indices whose contents are safe to sell or drop, cheapest first.
///
/// An index qualifies when the item is above its keep-minimum, is not
/// reserved swap gear, and losing one copy does not reduce power.
pub fn useless_indices(snap: &mut WorldSnapshot, cfg: &PilotConfig) -> Vec<usize> {
    let mut found: Vec<(usize, i64)> = Vec::new();
    for idx in 0..snap.inventory.len() {
        let item = snap.inventory[idx].clone();
        if item.is_empty() || item.artifact {
            continue;
        }
        if item.quantity <= min_quantity(&item) {
            continue;
        }
        if is_reserved(snap, cfg, &item) {
            continue;
        }
        if copy_is_expendable(snap, cfg, idx) {
            found.push((idx, item.known_value()));
        }
    }
    found.sort_by_key(|&(_, value)| value);
    found.into_iter().map(|(idx, _)| idx).collect()
}
