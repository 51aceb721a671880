//! The greedy stockpile optimizer against the exhaustive oracle.
//!
//! Exhaustive search is the ground truth on small candidate sets: the
//! greedy sweep may tie or lose, never win, and both must leave the
//! snapshot untouched.

use proptest::prelude::*;

use rp_core::config::{HomeOptimizer, PilotConfig};
use rp_core::consts::HOME;
use rp_core::planner::stockpile;
use rp_core::snapshot::item::{Item, ItemKind, Tval};
use rp_core::snapshot::sv;
use rp_test::fixtures;

fn arb_surplus() -> impl Strategy<Value = Item> {
    // Quantities past every carried-reward cap, so each copy is expendable.
    prop_oneof![
        Just(fixtures::heal_potion(12)),
        Just(fixtures::ration(15)),
        Just(fixtures::oil_flask(15)),
        Just(Item::of(ItemKind::new(Tval::Scroll, sv::SCROLL_RECALL), 8).with_value(150)),
        Just(Item::of(ItemKind::new(Tval::Scroll, sv::SCROLL_TELEPORT), 6).with_value(40)),
        Just(Item::of(ItemKind::new(Tval::Book, 1), 3).with_value(25)),
    ]
}

fn total_gain(cfg: &PilotConfig, items: &[Item], home: &[Item]) -> i64 {
    let mut ctx = fixtures::town_context(1);
    for (i, item) in items.iter().enumerate() {
        ctx.snapshot.inventory[i] = item.clone();
    }
    for (i, item) in home.iter().enumerate() {
        ctx.snapshot.shops[HOME].ware[i] = item.clone();
    }
    ctx.snapshot.notice();
    let before = ctx.snapshot.clone();
    let plan = stockpile::plan_deposits(&mut ctx.snapshot, cfg);
    assert_eq!(ctx.snapshot, before, "planning must not mutate");
    plan.iter().map(|d| d.gain).sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn greedy_never_beats_exhaustive(
        items in proptest::collection::vec(arb_surplus(), 1..5),
        home in proptest::collection::vec(arb_surplus(), 0..3),
    ) {
        let mut greedy_cfg = PilotConfig::default();
        greedy_cfg.home_optimizer = HomeOptimizer::Greedy;
        let mut full_cfg = PilotConfig::default();
        full_cfg.home_optimizer = HomeOptimizer::Exhaustive;

        let g = total_gain(&greedy_cfg, &items, &home);
        let e = total_gain(&full_cfg, &items, &home);
        prop_assert!(e >= g, "exhaustive {} lost to greedy {}", e, g);
    }

    #[test]
    fn gains_are_strictly_positive(
        items in proptest::collection::vec(arb_surplus(), 1..5),
    ) {
        let mut ctx = fixtures::town_context(1);
        for (i, item) in items.iter().enumerate() {
            ctx.snapshot.inventory[i] = item.clone();
        }
        ctx.snapshot.notice();
        let cfg = PilotConfig::default();
        for deposit in stockpile::plan_deposits(&mut ctx.snapshot, &cfg) {
            prop_assert!(deposit.gain > 0);
        }
    }
}
