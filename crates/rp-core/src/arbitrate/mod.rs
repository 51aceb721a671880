//! Goal arbitration.
//!
//! Proposers are plain functions tried in a fixed priority order; the first
//! one to return an action wins the turn. When a whole pass declines, the
//! escalation ladder raises the accepted danger one rung at a time, and as
//! the last resort wipes all goal and tracking state and takes a random
//! step to break the deadlock.

pub mod caution;
pub mod danger;
pub mod economy;
pub mod flow;
pub mod gear;
pub mod offense;
pub mod survival;
pub mod twitch;

use strum::IntoEnumIterator;

use crate::consts::ESCALATION_RUNGS;
use crate::context::EngineContext;
use crate::host::{Action, Direction, PathFinder};
use crate::snapshot::item::Item;
use crate::snapshot::WorldSnapshot;

/// Collaborators a proposer may use besides the context.
pub struct Services<'a> {
    pub path: &'a mut dyn PathFinder,
}

/// One candidate decision-maker.
pub type Proposer = fn(&mut EngineContext, &mut Services) -> Option<Action>;

/// A named proposer, for the note trail.
#[derive(Clone, Copy)]
pub struct Step {
    pub name: &'static str,
    pub run: Proposer,
}

macro_rules! step {
    ($name:literal, $f:path) => {
        Step {
            name: $name,
            run: $f,
        }
    };
}

/// Priority chain while on a dungeon level.
pub const DUNGEON: &[Step] = &[
    step!("wear-light", survival::wear_light),
    step!("eat", survival::eat),
    step!("cure", survival::cure),
    step!("heal", survival::heal),
    step!("dig-out", survival::dig_out),
    step!("recall-restock", survival::recall_when_spent),
    step!("retreat", caution::retreat),
    step!("attack", offense::attack_adjacent),
    step!("wear-best", gear::wear_best),
    step!("remove-bad", gear::remove_bad),
    step!("shoot", offense::shoot),
    step!("continue", flow::continue_flow),
    step!("take", flow::take),
    step!("kill", flow::kill),
    step!("recover", caution::recover),
    step!("explore", flow::explore),
    step!("stairs", flow::stairs),
    step!("wander", twitch::wander),
];

/// Priority chain while in town, outside any shop.
pub const TOWN: &[Step] = &[
    step!("eat", survival::eat),
    step!("wear-best", gear::wear_best),
    step!("shop", economy::visit_shop),
    step!("money-scum", economy::money_scum),
    step!("descend", flow::stairs),
    step!("explore", flow::explore),
    step!("wander", twitch::wander),
];

/// Priority chain while standing inside a shop.
pub const STORE: &[Step] = &[step!("trade", economy::trade)];

/// Priority chain while stair-scumming for a fresh level.
pub const SCUM: &[Step] = &[
    step!("eat", survival::eat),
    step!("heal", survival::heal),
    step!("retreat", caution::retreat),
    step!("stairs", flow::stairs),
    step!("wander", twitch::wander),
];

/// First pack index matching a predicate.
pub(crate) fn find_pack(snap: &WorldSnapshot, pred: impl Fn(&Item) -> bool) -> Option<usize> {
    snap.inventory
        .iter()
        .position(|i| !i.is_empty() && pred(i))
}

/// One pass over a proposer table.
pub fn arbitrate(
    ctx: &mut EngineContext,
    services: &mut Services,
    steps: &[Step],
) -> Option<(&'static str, Action)> {
    for step in steps {
        if let Some(action) = (step.run)(ctx, services) {
            return Some((step.name, action));
        }
    }
    None
}

/// Arbitrate with the escalation ladder behind it.
///
/// A declined baseline pass raises the accepted danger and retries the
/// whole table, one retry per rung; the last raised rung also ignores
/// monsters while fleeing. The final rung is the wipe itself: goal state
/// and level tracking are cleared and a seeded-random step breaks the
/// deadlock, so this always commits to something.
pub fn arbitrate_with_escalation(
    ctx: &mut EngineContext,
    services: &mut Services,
    steps: &[Step],
) -> (&'static str, Action) {
    if let Some(hit) = arbitrate(ctx, services, steps) {
        return hit;
    }
    for rung in 1..ESCALATION_RUNGS {
        ctx.bravery = ctx.bravery.saturating_add(1);
        if rung + 1 == ESCALATION_RUNGS {
            ctx.goal.ignoring = true;
        }
        ctx.note(format!("no proposal, escalating to rung {}", ctx.bravery));
        if let Some(hit) = arbitrate(ctx, services, steps) {
            return hit;
        }
    }

    // Deadlocked: forget everything and shake loose.
    ctx.note("deadlocked, wiping goals and level memory");
    ctx.goal.reset();
    ctx.snapshot.level.wipe();
    let dirs: Vec<Direction> = Direction::iter()
        .filter(|d| *d != Direction::Here)
        .collect();
    let dir = ctx.rng.choose(&dirs).copied().unwrap_or(Direction::North);
    ("unstuck", Action::Move(dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PilotConfig;
    use crate::host::FlowGoal;

    struct NoPath;

    impl PathFinder for NoPath {
        fn next_step(&mut self, _: &WorldSnapshot, _: FlowGoal) -> Option<Direction> {
            None
        }
    }

    #[test]
    fn deadlock_always_commits() {
        let mut ctx = EngineContext::new(PilotConfig::default(), 42);
        ctx.snapshot.player.depth = 3;
        ctx.snapshot.player.cur_hp = 10;
        ctx.snapshot.player.max_hp = 10;
        ctx.snapshot.notice();
        let mut path = NoPath;
        let mut services = Services { path: &mut path };
        // Nothing to do anywhere: the ladder must still produce an action.
        let (name, action) = arbitrate_with_escalation(&mut ctx, &mut services, DUNGEON);
        assert!(matches!(action, Action::Move(_)) || name != "unstuck");
    }

    #[test]
    fn deadlock_wipes_goal_state() {
        let mut ctx = EngineContext::new(PilotConfig::default(), 42);
        ctx.snapshot.player.depth = 3;
        ctx.snapshot.player.cur_hp = 10;
        ctx.snapshot.player.max_hp = 10;
        ctx.snapshot.notice();
        ctx.goal.leaving = true;
        let mut path = NoPath;
        let mut services = Services { path: &mut path };
        let (name, _) = arbitrate_with_escalation(&mut ctx, &mut services, &[]);
        assert_eq!(name, "unstuck");
        assert!(!ctx.goal.leaving);
    }

    #[test]
    fn each_declined_pass_raises_bravery_once() {
        fn declines(ctx: &mut EngineContext, _: &mut Services) -> Option<Action> {
            ctx.note(format!("pass at bravery {}", ctx.bravery));
            None
        }
        let mut ctx = EngineContext::new(PilotConfig::default(), 5);
        ctx.snapshot.notice();
        let mut path = NoPath;
        let mut services = Services { path: &mut path };
        let steps = &[Step {
            name: "declines",
            run: declines,
        }];
        let (name, _) = arbitrate_with_escalation(&mut ctx, &mut services, steps);
        assert_eq!(name, "unstuck");
        let passes: Vec<&str> = ctx
            .notes
            .iter()
            .filter(|n| n.starts_with("pass at bravery"))
            .collect();
        // One baseline pass, then one pass per raised rung, then the wipe.
        assert_eq!(
            passes,
            ["pass at bravery 0", "pass at bravery 1", "pass at bravery 2"]
        );
        assert_eq!(ctx.bravery, 2);
    }

    #[test]
    fn unstuck_is_seed_deterministic() {
        let run = |seed| {
            let mut ctx = EngineContext::new(PilotConfig::default(), seed);
            ctx.snapshot.notice();
            let mut path = NoPath;
            let mut services = Services { path: &mut path };
            arbitrate_with_escalation(&mut ctx, &mut services, &[]).1
        };
        assert_eq!(run(7), run(7));
    }
}
