//! Town economy proposers: walking to shops, trading inside them, and the
//! money-scum idle loop.

use crate::context::EngineContext;
use crate::goal::GoalKind;
use crate::host::{Action, FlowGoal};
use crate::planner::{self, TradeAction};

use super::Services;

/// Escape key: leave the current shop.
const ESC: char = '\u{1b}';

/// Walk toward the shop the planner wants to trade in.
pub fn visit_shop(ctx: &mut EngineContext, services: &mut Services) -> Option<Action> {
    if !ctx.snapshot.in_town() || ctx.snapshot.in_shop.is_some() {
        return None;
    }

    if ctx.goal.shop.is_none() {
        let trade = planner::plan_best_trade(ctx)?;
        ctx.goal.kind = GoalKind::Shop;
        ctx.goal.shop = Some(trade.shop);
        match trade.action {
            TradeAction::Sell { inv_idx, .. } => ctx.goal.item = Some(inv_idx),
            TradeAction::Buy { ware_idx, .. } => ctx.goal.ware = Some(ware_idx),
        }
        ctx.note(format!("heading to shop {}", trade.shop));
    }

    let shop = ctx.goal.shop?;
    match services.path.next_step(&ctx.snapshot, FlowGoal::Shop(shop)) {
        Some(step) => Some(Action::Move(step)),
        None => {
            // Entrance unreachable: drop the errand.
            ctx.goal.clear_trade();
            ctx.goal.clear_flow();
            None
        }
    }
}

/// Trade while standing inside a shop. Always commits: either a trade or
/// the escape key out.
pub fn trade(ctx: &mut EngineContext, _services: &mut Services) -> Option<Action> {
    let here = ctx.snapshot.in_shop?;

    let trade = planner::plan_best_trade(ctx);
    match trade {
        Some(trade) if trade.shop == here => {
            ctx.goal.clear_trade();
            ctx.goal.clear_flow();
            match trade.action {
                TradeAction::Sell { inv_idx, quantity } => {
                    let kind = ctx.snapshot.inventory[inv_idx].kind;
                    ctx.ledger.record_sale(kind, here);
                    ctx.note(format!("selling slot {inv_idx}"));
                    Some(Action::SellItem {
                        slot: inv_idx,
                        quantity,
                    })
                }
                TradeAction::Buy { ware_idx, quantity } => {
                    let kind = ctx.snapshot.shops[here].ware[ware_idx].kind;
                    ctx.ledger.record_purchase(kind, here);
                    ctx.note(format!("buying ware {ware_idx}"));
                    Some(Action::BuyWare {
                        ware: ware_idx,
                        quantity,
                    })
                }
            }
        }
        Some(trade) => {
            // Business elsewhere: remember it and step out.
            ctx.goal.kind = GoalKind::Shop;
            ctx.goal.shop = Some(trade.shop);
            Some(Action::Key(ESC))
        }
        None => {
            ctx.goal.clear_trade();
            ctx.goal.clear_flow();
            Some(Action::Key(ESC))
        }
    }
}

/// Idle in town until the purse reaches the configured scum target.
pub fn money_scum(ctx: &mut EngineContext, _services: &mut Services) -> Option<Action> {
    let target = ctx.config.money_scum_amount;
    if target <= 0 || !ctx.snapshot.in_town() || ctx.snapshot.gold >= target {
        return None;
    }
    ctx.note(format!(
        "money scumming: {} of {target} gold",
        ctx.snapshot.gold
    ));
    Some(Action::Key('R'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PilotConfig;
    use crate::consts::HOME;
    use crate::host::{Direction, PathFinder};
    use crate::snapshot::item::{Item, ItemKind, Tval};
    use crate::snapshot::{sv, WorldSnapshot};

    struct AnyPath;
    impl PathFinder for AnyPath {
        fn next_step(&mut self, _: &WorldSnapshot, _: FlowGoal) -> Option<Direction> {
            Some(Direction::North)
        }
    }

    fn town_ctx() -> EngineContext {
        let mut ctx = EngineContext::new(PilotConfig::default(), 1);
        ctx.snapshot.player.cur_hp = 30;
        ctx.snapshot.player.max_hp = 30;
        ctx.snapshot.notice();
        ctx
    }

    #[test]
    fn walks_to_the_planned_shop() {
        let mut ctx = town_ctx();
        ctx.snapshot.inventory[0] =
            Item::of(ItemKind::new(Tval::Potion, sv::POTION_HEAL), 10).with_value(50);
        ctx.snapshot.notice();
        let mut path = AnyPath;
        let mut services = Services { path: &mut path };
        let action = visit_shop(&mut ctx, &mut services);
        assert_eq!(action, Some(Action::Move(Direction::North)));
        assert_eq!(ctx.goal.shop, Some(HOME));
    }

    #[test]
    fn nothing_to_trade_means_no_errand() {
        let mut ctx = town_ctx();
        let mut path = AnyPath;
        let mut services = Services { path: &mut path };
        assert_eq!(visit_shop(&mut ctx, &mut services), None);
        assert_eq!(ctx.goal.shop, None);
    }

    #[test]
    fn inside_the_right_shop_executes() {
        let mut ctx = town_ctx();
        ctx.snapshot.inventory[0] =
            Item::of(ItemKind::new(Tval::Potion, sv::POTION_HEAL), 10).with_value(50);
        ctx.snapshot.in_shop = Some(HOME);
        ctx.snapshot.notice();
        let mut path = AnyPath;
        let mut services = Services { path: &mut path };
        let action = trade(&mut ctx, &mut services);
        assert_eq!(
            action,
            Some(Action::SellItem {
                slot: 0,
                quantity: 1
            })
        );
        // The deposit is on the ledger so it will not bounce back out.
        assert!(ctx
            .ledger
            .sold_to(ItemKind::new(Tval::Potion, sv::POTION_HEAL), HOME));
    }

    #[test]
    fn wrong_shop_steps_out() {
        let mut ctx = town_ctx();
        ctx.snapshot.inventory[0] =
            Item::of(ItemKind::new(Tval::Potion, sv::POTION_HEAL), 10).with_value(50);
        ctx.snapshot.in_shop = Some(2);
        ctx.snapshot.notice();
        let mut path = AnyPath;
        let mut services = Services { path: &mut path };
        assert_eq!(trade(&mut ctx, &mut services), Some(Action::Key(ESC)));
        assert_eq!(ctx.goal.shop, Some(HOME));
    }

    #[test]
    fn money_scum_rests_until_rich() {
        let mut ctx = town_ctx();
        ctx.config.money_scum_amount = 500;
        ctx.snapshot.gold = 100;
        let mut path = AnyPath;
        let mut services = Services { path: &mut path };
        assert_eq!(money_scum(&mut ctx, &mut services), Some(Action::Key('R')));
        ctx.snapshot.gold = 500;
        assert_eq!(money_scum(&mut ctx, &mut services), None);
    }
}
