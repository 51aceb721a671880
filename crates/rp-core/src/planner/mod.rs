//! Transaction planner.
//!
//! Decides the single best town trade right now. Steps run in a fixed
//! priority order; the first step that finds a worthwhile trade wins:
//!
//!   1. stockpile an expendable item at home
//!   2. sell an expendable item to the best-paying shop
//!   3. buy something that raises power from a real shop
//!   4. take something that raises power from home
//!   5. buy something home wants from a real shop (rich purse only)
//!   6. pull a dead item out of home for resale
//!   7. pull reserve swap gear out of home
//!
//! Every candidate is judged through a sandbox trial; the planner itself
//! never leaves a mark on the snapshot.

pub mod junk;
pub mod stockpile;

use serde::{Deserialize, Serialize};

use crate::config::PilotConfig;
use crate::consts::{HOME, SHOP_COUNT};
use crate::context::EngineContext;
use crate::power::{home, home_power, home_power_with};
use crate::sandbox::{self, MutationError, Scope};
use crate::snapshot::item::{Item, Tval};
use crate::snapshot::{Slot, WorldSnapshot};

/// What to do once standing inside `shop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    Sell { inv_idx: usize, quantity: u16 },
    Buy { ware_idx: usize, quantity: u16 },
}

/// One planned trade: which shop to visit and what to do there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub shop: usize,
    pub action: TradeAction,
    /// Power or home-power improvement the trial measured, for notes.
    pub gain: i64,
}

/// Matches the copy `take_from_shop` just landed in the pack.
fn find_landed(inventory: &[Item], like: &Item) -> Option<usize> {
    inventory.iter().position(|i| {
        !i.is_empty()
            && i.kind == like.kind
            && i.to_hit == like.to_hit
            && i.to_dam == like.to_dam
            && i.to_ac == like.to_ac
    })
}

/// Equipment slots a purchase of this item should be tried in.
fn wear_slots(item: &Item) -> Vec<Slot> {
    if item.kind.tval == Tval::Ring {
        // Both hands; an occupied left hand must not hide a free right one.
        vec![Slot::RingLeft, Slot::RingRight]
    } else {
        Slot::for_tval(item.kind.tval).into_iter().collect()
    }
}

/// Step 1: best deposit into the home stockpile.
fn step_stockpile(ctx: &mut EngineContext) -> Option<Trade> {
    let plan = stockpile::plan_deposits(&mut ctx.snapshot, &ctx.config);
    plan.first().map(|d| Trade {
        shop: HOME,
        action: TradeAction::Sell {
            inv_idx: d.inv_idx,
            quantity: 1,
        },
        gain: d.gain,
    })
}

/// Step 2: sell the cheapest expendable item to whichever shop pays the
/// most for it. Cheapest first keeps the valuable spares in the pack for
/// later emergencies.
fn step_sell(ctx: &mut EngineContext) -> Option<Trade> {
    // Candidates arrive cheapest first.
    for inv_idx in junk::useless_indices(&mut ctx.snapshot, &ctx.config) {
        let item = ctx.snapshot.inventory[inv_idx].clone();
        let mut best: Option<(usize, i64)> = None;
        for shop in 0..SHOP_COUNT {
            if ctx.ledger.bought_from(item.kind, shop) {
                continue;
            }
            let price = ctx.snapshot.shops[shop].offer_price(&item);
            if price < ctx.config.min_sell_value {
                continue;
            }
            if ctx.snapshot.shops[shop].landing_slot(&item).is_none() {
                continue;
            }
            if best.map_or(true, |(_, p)| price > p) {
                best = Some((shop, price));
            }
        }
        if let Some((shop, price)) = best {
            return Some(Trade {
                shop,
                action: TradeAction::Sell {
                    inv_idx,
                    quantity: 1,
                },
                gain: price,
            });
        }
    }
    None
}

/// Trial: buy one copy of `ware_idx` from `shop`, paying its price, then
/// wear it if it is gear. Reports the power movement.
fn buy_trial(
    snap: &mut WorldSnapshot,
    cfg: &PilotConfig,
    shop: usize,
    ware_idx: usize,
    wear: Option<Slot>,
) -> i64 {
    let like = snap.shops[shop].ware[ware_idx].clone();
    let price = snap.shops[shop].asking_price(&like);
    let outcome = sandbox::with_mutation(snap, cfg, Scope::with_shop(shop), |s| {
        if price > s.gold {
            return Err(MutationError::Infeasible);
        }
        sandbox::take_from_shop(s, shop, ware_idx)?;
        s.gold -= price;
        if let Some(slot) = wear {
            let idx = find_landed(&s.inventory, &like).ok_or(MutationError::Infeasible)?;
            sandbox::wear_from_inventory(s, idx, slot)?;
        }
        Ok(())
    });
    outcome.power_gain()
}

/// Steps 3 and 4: buy whatever raises power the most, from the real shops
/// or (for free) from home.
fn step_buy(ctx: &mut EngineContext, shops: std::ops::RangeInclusive<usize>) -> Option<Trade> {
    let has_digger = ctx
        .snapshot
        .count_where(|i| i.kind.tval == Tval::Digger)
        > 0
        || ctx
            .snapshot
            .equipment
            .get(Slot::Weapon)
            .is_some_and(|w| w.kind.tval == Tval::Digger);

    let mut best: Option<(Trade, i64, i64)> = None;
    for shop in shops {
        for ware_idx in 0..ctx.snapshot.shops[shop].ware.len() {
            let ware = ctx.snapshot.shops[shop].ware[ware_idx].clone();
            if ware.is_empty() {
                continue;
            }
            if ctx.ledger.sold_to(ware.kind, shop) {
                continue;
            }
            // One digger is plenty.
            if ware.kind.tval == Tval::Digger && has_digger {
                continue;
            }
            let price = ctx.snapshot.shops[shop].asking_price(&ware);
            if price > ctx.snapshot.gold {
                continue;
            }

            let mut slots: Vec<Option<Slot>> = vec![None];
            if ware.kind.tval.is_wearable() {
                slots.extend(wear_slots(&ware).into_iter().map(Some));
            }
            for wear in slots {
                let gain = buy_trial(&mut ctx.snapshot, &ctx.config, shop, ware_idx, wear);
                let better = best
                    .as_ref()
                    .map_or(true, |&(_, g, p)| gain > g || (gain == g && price < p));
                if gain > 0 && better {
                    best = Some((
                        Trade {
                            shop,
                            action: TradeAction::Buy {
                                ware_idx,
                                quantity: 1,
                            },
                            gain,
                        },
                        gain,
                        price,
                    ));
                }
            }
        }
    }
    best.map(|(trade, _, _)| trade)
}

/// Trial purchase on a scratch snapshot: true when the deposit plan would
/// send the bought copy home.
fn optimizer_would_deposit(
    ctx: &EngineContext,
    shop: usize,
    ware_idx: usize,
    price: i64,
) -> bool {
    let kind = ctx.snapshot.shops[shop].ware[ware_idx].kind;
    let mut trial = ctx.snapshot.clone();
    if sandbox::take_from_shop(&mut trial, shop, ware_idx).is_err() {
        return false;
    }
    trial.gold -= price;
    trial.notice();
    stockpile::plan_deposits(&mut trial, &ctx.config)
        .iter()
        .any(|d| trial.inventory[d.inv_idx].kind == kind)
}

/// Step 5: buy an item the stockpile wants, only with a deep purse.
///
/// Demand means the item scores into an empty home on category merits;
/// resale value alone never qualifies. The stockpile optimizer then has to
/// confirm it would deposit the bought copy.
fn step_grab_for_home(ctx: &mut EngineContext) -> Option<Trade> {
    let budget = ctx.snapshot.gold / 10;
    let mut best: Option<(Trade, i64)> = None;

    for shop in 0..SHOP_COUNT {
        for ware_idx in 0..ctx.snapshot.shops[shop].ware.len() {
            let ware = ctx.snapshot.shops[shop].ware[ware_idx].clone();
            if ware.is_empty() || ctx.ledger.sold_to(ware.kind, shop) {
                continue;
            }
            let price = ctx.snapshot.shops[shop].asking_price(&ware);
            if price == 0 || price > budget {
                continue;
            }
            if ctx.snapshot.shops[HOME].landing_slot(&ware).is_none() {
                continue;
            }
            let mut one = ware.clone();
            one.quantity = 1;
            let mut solo = home::tally_wares(std::slice::from_ref(&one));
            solo.total_value = 0;
            if home::score(&solo) <= 0 {
                continue;
            }
            let gain = home_power_with(&ctx.snapshot, Some(&one)) - home_power(&ctx.snapshot);
            if gain <= 0 || !optimizer_would_deposit(ctx, shop, ware_idx, price) {
                continue;
            }
            if best.as_ref().map_or(true, |&(_, g)| gain > g) {
                best = Some((
                    Trade {
                        shop,
                        action: TradeAction::Buy {
                            ware_idx,
                            quantity: 1,
                        },
                        gain,
                    },
                    gain,
                ));
            }
        }
    }
    best.map(|(trade, _)| trade)
}

/// Step 6: pull a dead item out of home so a later sell step liquidates it.
fn step_release_from_home(ctx: &mut EngineContext) -> Option<Trade> {
    if ctx.snapshot.pack_full() {
        return None;
    }
    for ware_idx in 0..ctx.snapshot.shops[HOME].ware.len() {
        let ware = ctx.snapshot.shops[HOME].ware[ware_idx].clone();
        if ware.is_empty() || ctx.ledger.bought_from(ware.kind, HOME) {
            continue;
        }
        // Contributes nothing: the stockpile scores the same without it.
        let mut without = ctx.snapshot.shops[HOME].ware.clone();
        let mut one = ware.clone();
        one.quantity = 1;
        let removed = without[ware_idx].split(1).is_some();
        if !removed {
            continue;
        }
        let score_without = home::score(&home::tally_wares(&without));
        if score_without < home_power(&ctx.snapshot) {
            continue;
        }
        // Only worth the trip if somebody pays for it.
        let sellable = (0..SHOP_COUNT)
            .any(|s| ctx.snapshot.shops[s].offer_price(&one) >= ctx.config.min_sell_value);
        if !sellable {
            continue;
        }
        return Some(Trade {
            shop: HOME,
            action: TradeAction::Buy {
                ware_idx,
                quantity: 1,
            },
            gain: 0,
        });
    }
    None
}

/// Step 7: stock reserve swap gear from home.
fn step_swap_gear(ctx: &mut EngineContext) -> Option<Trade> {
    if !ctx.config.uses_swaps || ctx.snapshot.pack_full() {
        return None;
    }
    let need_weapon = ctx.snapshot.equipment.swap_weapon.is_none();
    let need_armour = ctx.snapshot.equipment.swap_armour.is_none();
    if !need_weapon && !need_armour {
        return None;
    }
    let mut best: Option<(usize, i64)> = None;
    for (ware_idx, ware) in ctx.snapshot.shops[HOME].ware.iter().enumerate() {
        if ware.is_empty() || !ware.ident || ware.cursed {
            continue;
        }
        let worth = match ware.kind.tval {
            Tval::Weapon if need_weapon => ware.blow_damage(),
            t if t.is_armour() && need_armour => ware.to_ac.max(0) as i64,
            _ => continue,
        };
        if worth > 0 && best.map_or(true, |(_, w)| worth > w) {
            best = Some((ware_idx, worth));
        }
    }
    best.map(|(ware_idx, worth)| Trade {
        shop: HOME,
        action: TradeAction::Buy {
            ware_idx,
            quantity: 1,
        },
        gain: worth,
    })
}

/// The single best trade available right now, if any.
///
/// Runs the steps in priority order and stops at the first hit. The
/// snapshot is bit-identical before and after planning.
pub fn plan_best_trade(ctx: &mut EngineContext) -> Option<Trade> {
    if !ctx.snapshot.in_town() {
        return None;
    }
    step_stockpile(ctx)
        .or_else(|| step_sell(ctx))
        .or_else(|| step_buy(ctx, 0..=SHOP_COUNT - 1))
        .or_else(|| step_buy(ctx, HOME..=HOME))
        .or_else(|| step_grab_for_home(ctx))
        .or_else(|| step_release_from_home(ctx))
        .or_else(|| step_swap_gear(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::item::ItemKind;
    use crate::snapshot::sv;

    fn town_ctx() -> EngineContext {
        let mut ctx = EngineContext::new(PilotConfig::default(), 7);
        ctx.snapshot.player.cur_hp = 30;
        ctx.snapshot.player.max_hp = 30;
        ctx.snapshot.player.level = 5;
        ctx.snapshot.notice();
        ctx
    }

    #[test]
    fn planning_leaves_no_trace() {
        let mut ctx = town_ctx();
        ctx.snapshot.gold = 500;
        ctx.snapshot.shops[4].ware[0] =
            Item::of(ItemKind::new(Tval::Potion, sv::POTION_HEAL), 5).with_value(50);
        ctx.snapshot.notice();
        let before = ctx.snapshot.clone();
        let _ = plan_best_trade(&mut ctx);
        assert_eq!(ctx.snapshot, before);
    }

    #[test]
    fn worthless_potions_produce_no_trade() {
        let mut ctx = town_ctx();
        // Known-worthless potions: nobody pays, home gains nothing.
        ctx.snapshot.inventory[0] =
            Item::of(ItemKind::new(Tval::Potion, 9), 6).identified().with_value(0);
        ctx.snapshot.notice();
        assert_eq!(plan_best_trade(&mut ctx), None);
    }

    #[test]
    fn expendables_go_home_before_market() {
        let mut ctx = town_ctx();
        // Ten heal potions: well past the carried reward cap, so one copy
        // is free to give up.
        ctx.snapshot.inventory[0] =
            Item::of(ItemKind::new(Tval::Potion, sv::POTION_HEAL), 10).with_value(50);
        ctx.snapshot.notice();
        let trade = plan_best_trade(&mut ctx).unwrap();
        assert_eq!(trade.shop, HOME);
        assert!(matches!(trade.action, TradeAction::Sell { inv_idx: 0, .. }));
    }

    #[test]
    fn full_home_falls_back_to_selling() {
        let mut ctx = town_ctx();
        ctx.snapshot.inventory[0] =
            Item::of(ItemKind::new(Tval::Potion, sv::POTION_HEAL), 10).with_value(50);
        // Saturate every home slot with unmergeable junk.
        for (i, ware) in ctx.snapshot.shops[HOME].ware.iter_mut().enumerate() {
            *ware = Item::of(ItemKind::new(Tval::Junk, (i % 200) as u8), 1).with_value(0);
        }
        ctx.snapshot.notice();
        let trade = plan_best_trade(&mut ctx).unwrap();
        assert!(trade.shop < SHOP_COUNT);
        assert!(matches!(trade.action, TradeAction::Sell { .. }));
    }

    #[test]
    fn sells_the_cheapest_expendable_first() {
        let mut ctx = town_ctx();
        ctx.snapshot.inventory[0] = Item::of(ItemKind::new(Tval::Junk, 1), 1).with_value(100);
        ctx.snapshot.inventory[1] = Item::of(ItemKind::new(Tval::Junk, 2), 1).with_value(20);
        // Home full of unrelated clutter: stockpiling is off the table.
        for (i, ware) in ctx.snapshot.shops[HOME].ware.iter_mut().enumerate() {
            *ware = Item::of(ItemKind::new(Tval::Junk, ((i % 150) + 50) as u8), 1).with_value(0);
        }
        ctx.snapshot.notice();
        let trade = plan_best_trade(&mut ctx).unwrap();
        assert!(trade.shop < SHOP_COUNT);
        // The pricier spare stays in the pack.
        assert!(matches!(trade.action, TradeAction::Sell { inv_idx: 1, .. }));
    }

    #[test]
    fn resale_value_alone_is_not_home_demand() {
        let mut ctx = town_ctx();
        ctx.snapshot.gold = 1_000;
        let bauble = Item::of(ItemKind::new(Tval::Junk, 3), 1).with_value(80).identified();
        ctx.snapshot.shops[0].ware[0] = bauble.clone();
        ctx.snapshot.notice();
        // The value tie-break gives a positive raw home gain, nothing more.
        assert!(home_power_with(&ctx.snapshot, Some(&bauble)) > home_power(&ctx.snapshot));
        assert_eq!(step_grab_for_home(&mut ctx), None);
        assert_eq!(plan_best_trade(&mut ctx), None);
    }

    #[test]
    fn home_grab_needs_the_optimizer_to_agree() {
        let mut ctx = town_ctx();
        ctx.snapshot.gold = 500;
        ctx.snapshot.shops[0].ware[0] =
            Item::of(ItemKind::new(Tval::Food, sv::FOOD_RATION), 10).with_value(3);
        ctx.snapshot.notice();
        // No food carried: a bought ration stays in the pack reserve, the
        // deposit plan never includes it, and the grab is declined.
        assert_eq!(step_grab_for_home(&mut ctx), None);

        // Carrying plenty, one more ration is deposit material.
        ctx.snapshot.inventory[0] =
            Item::of(ItemKind::new(Tval::Food, sv::FOOD_RATION), 12).with_value(3);
        ctx.snapshot.notice();
        let trade = step_grab_for_home(&mut ctx).unwrap();
        assert_eq!(trade.shop, 0);
        assert!(matches!(trade.action, TradeAction::Buy { ware_idx: 0, .. }));
    }

    #[test]
    fn buys_heal_potions_with_gold() {
        let mut ctx = town_ctx();
        ctx.snapshot.gold = 1_000;
        ctx.snapshot.shops[4].ware[0] =
            Item::of(ItemKind::new(Tval::Potion, sv::POTION_HEAL), 5).with_value(50).identified();
        ctx.snapshot.notice();
        let trade = plan_best_trade(&mut ctx).unwrap();
        assert_eq!(trade.shop, 4);
        assert!(matches!(trade.action, TradeAction::Buy { ware_idx: 0, .. }));
    }

    #[test]
    fn never_buys_back_what_it_sold() {
        let mut ctx = town_ctx();
        ctx.snapshot.gold = 1_000;
        let heal = ItemKind::new(Tval::Potion, sv::POTION_HEAL);
        ctx.snapshot.shops[4].ware[0] = Item::of(heal, 5).with_value(50).identified();
        ctx.snapshot.notice();
        ctx.ledger.record_sale(heal, 4);
        assert_eq!(plan_best_trade(&mut ctx), None);
    }

    #[test]
    fn takes_free_gear_from_home() {
        let mut ctx = town_ctx();
        let mut sword = Item::of(ItemKind::new(Tval::Weapon, 2), 1).identified();
        sword.damage_dice = 3;
        sword.damage_sides = 6;
        ctx.snapshot.shops[HOME].ware[0] = sword;
        ctx.snapshot.notice();
        let trade = plan_best_trade(&mut ctx).unwrap();
        assert_eq!(trade.shop, HOME);
        assert!(matches!(trade.action, TradeAction::Buy { ware_idx: 0, .. }));
    }

    #[test]
    fn ring_purchase_tries_the_free_hand() {
        let mut ctx = town_ctx();
        ctx.snapshot.gold = 2_000;
        // Left hand already carries a strong ring.
        let strong = Item::of(ItemKind::new(Tval::Ring, 2), 1)
            .identified()
            .with_flags(crate::snapshot::item::ItemFlags::RES_POIS);
        ctx.snapshot.equipment.set(Slot::RingLeft, Some(strong));
        let fire = Item::of(ItemKind::new(Tval::Ring, 3), 1)
            .identified()
            .with_flags(crate::snapshot::item::ItemFlags::RES_FIRE)
            .with_value(100);
        ctx.snapshot.shops[5].ware[0] = fire;
        ctx.snapshot.notice();
        let trade = plan_best_trade(&mut ctx).unwrap();
        assert_eq!(trade.shop, 5);
        assert!(matches!(trade.action, TradeAction::Buy { ware_idx: 0, .. }));
    }

    #[test]
    fn no_trades_outside_town() {
        let mut ctx = town_ctx();
        ctx.snapshot.player.depth = 5;
        ctx.snapshot.inventory[0] =
            Item::of(ItemKind::new(Tval::Potion, sv::POTION_HEAL), 10).with_value(50);
        ctx.snapshot.notice();
        assert_eq!(plan_best_trade(&mut ctx), None);
    }
}
