//! The turn driver: one entry point per host turn.
//!
//! Owns the bookkeeping the proposers must be able to rely on: stale-view
//! refreshes, clock wraparound, boredom and panel-stall thresholds, stop
//! conditions, and finally a single arbitration pass that emits at most one
//! action to the host.

use crate::arbitrate::{self, Services};
use crate::consts::{
    BOREDOM_TURNS, CLOCK_OVERFLOW_AT, CLOCK_RESYNC_AT, PANEL_CLEAR_GOALS, PANEL_FORCE_FLEE,
    PANEL_WIPE_MEMORY,
};
use crate::context::EngineContext;
use crate::host::{Host, PathFinder};
use crate::power::power;

/// What one driver invocation amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// An action went to the host.
    Acted,
    /// Internal refresh only; the host should call again.
    Bookkeeping,
    /// The session has ended; no further actions will be emitted.
    SessionOver,
}

/// Run one decision turn.
///
/// Emits at most one action. Refresh turns emit nothing and return
/// [`TurnOutcome::Bookkeeping`]; the host is expected to call again after
/// re-sensing whatever was marked stale.
pub fn run_one_turn(
    ctx: &mut EngineContext,
    path: &mut dyn PathFinder,
    host: &mut dyn Host,
) -> TurnOutcome {
    if ctx.session_over || host.session_over() {
        ctx.session_over = true;
        return TurnOutcome::SessionOver;
    }

    // A depth change means a fresh level: goal state, level memory, and the
    // level clock all restart before anything else looks at them.
    let depth = ctx.snapshot.player.depth;
    if ctx.depth_seen != Some(depth) {
        if ctx.depth_seen.is_some() {
            ctx.note(format!("arrived at depth {depth}"));
            ctx.on_level_change();
            if depth == 0 {
                ctx.on_town_entry();
            }
        }
        ctx.depth_seen = Some(depth);
    }

    ctx.clock.tick();

    // Stale cached views: recompute and give sensing a turn to catch up.
    if ctx.snapshot.refresh.equipment || ctx.snapshot.refresh.inventory {
        ctx.snapshot.refresh.equipment = false;
        ctx.snapshot.refresh.inventory = false;
        ctx.snapshot.refresh.spells = false;
        ctx.snapshot.notice();
        ctx.power = power(&ctx.snapshot, &ctx.config);
        return TurnOutcome::Bookkeeping;
    }
    if ctx.snapshot.refresh.panel {
        ctx.snapshot.refresh.panel = false;
        ctx.clock.shift_panel();
        return TurnOutcome::Bookkeeping;
    }

    // Clock hygiene.
    if ctx.clock.turn >= CLOCK_OVERFLOW_AT {
        ctx.note("game clock wrapped, abandoning the session");
        ctx.session_over = true;
        return TurnOutcome::SessionOver;
    }
    if CLOCK_RESYNC_AT.contains(&ctx.clock.turn) {
        ctx.note("scheduled resync of cached views");
        ctx.snapshot.refresh.rearm();
        return TurnOutcome::Bookkeeping;
    }

    // Stop conditions from config.
    let player = &ctx.snapshot.player;
    if ctx.config.stop_depth > 0 && player.depth >= ctx.config.stop_depth
        || ctx.config.stop_level > 0 && player.level >= ctx.config.stop_level
    {
        ctx.note("configured stop condition reached");
        ctx.session_over = true;
        return TurnOutcome::SessionOver;
    }
    if ctx.config.money_scum_amount > 0
        && !ctx.config.self_scum
        && ctx.snapshot.in_town()
        && ctx.snapshot.gold >= ctx.config.money_scum_amount
    {
        ctx.note("money target reached");
        ctx.session_over = true;
        return TurnOutcome::SessionOver;
    }

    // Danger judgements assume the HP they were made at.
    if ctx.avoidance != player.cur_hp {
        ctx.avoidance = player.cur_hp;
        ctx.bravery = 0;
    }

    // Boredom: too long on one level forces a change of scenery.
    if ctx.clock.turns_on_level() >= BOREDOM_TURNS && !ctx.goal.leaving {
        ctx.note("bored of this level, leaving");
        ctx.goal.leaving = true;
    }

    // Panel stall ladder: clear goals, then forget movables, then flee.
    match ctx.clock.panel_turns {
        t if t == PANEL_CLEAR_GOALS => {
            ctx.note("stalled, clearing goals");
            ctx.goal.clear_flow();
            ctx.goal.clear_trade();
        }
        t if t == PANEL_WIPE_MEMORY => {
            ctx.note("still stalled, forgetting monsters and objects");
            ctx.snapshot.level.forget_movables();
        }
        t if t >= PANEL_FORCE_FLEE => {
            if !ctx.goal.fleeing {
                ctx.note("hard stall, fleeing the level");
                ctx.goal.fleeing = true;
            }
        }
        _ => {}
    }

    // Stair-scum mode dives with a reduced table.
    ctx.goal.scumming = ctx.config.stair_scum && !ctx.snapshot.in_town();

    let table = if ctx.snapshot.in_shop.is_some() {
        arbitrate::STORE
    } else if ctx.snapshot.in_town() {
        arbitrate::TOWN
    } else if ctx.goal.scumming {
        arbitrate::SCUM
    } else {
        arbitrate::DUNGEON
    };

    let mut services = Services { path };
    let (name, action) = arbitrate::arbitrate_with_escalation(ctx, &mut services, table);
    ctx.note(format!("{name}: {action:?}"));
    ctx.bravery = 0;
    ctx.goal.ignoring = false;
    host.emit(action);
    TurnOutcome::Acted
}
