//! Flow proposers: walking toward objects, monsters, frontier, and stairs.
//!
//! Each proposer re-validates its target against current knowledge before
//! stepping; a goal whose target has evaporated is cleared, never chased.

use crate::context::EngineContext;
use crate::goal::GoalKind;
use crate::host::{Action, FlowGoal};
use crate::prepared::prepared;
use crate::snapshot::terrain::Feature;

use super::danger::danger_at;
use super::Services;

/// Keep walking an active flow goal.
pub fn continue_flow(ctx: &mut EngineContext, services: &mut Services) -> Option<Action> {
    let target = ctx.goal.target?;
    let still_valid = match ctx.goal.kind {
        GoalKind::Take => ctx.snapshot.level.objects.iter().any(|o| o.pos == target),
        GoalKind::Kill => ctx.snapshot.level.monsters.iter().any(|m| m.pos == target),
        GoalKind::None => false,
        _ => true,
    };
    if !still_valid {
        ctx.goal.clear_flow();
        return None;
    }
    if ctx.snapshot.pos == target {
        let arrived = ctx.goal.kind;
        ctx.goal.clear_flow();
        return match arrived {
            GoalKind::Take => Some(Action::Key(',')),
            _ => None,
        };
    }
    match services.path.next_step(&ctx.snapshot, FlowGoal::Tile(target)) {
        Some(step) => Some(Action::Move(step)),
        None => {
            ctx.goal.clear_flow();
            None
        }
    }
}

/// Walk to (or pick up) the most valuable known object.
pub fn take(ctx: &mut EngineContext, services: &mut Services) -> Option<Action> {
    if ctx.snapshot.pack_full() {
        return None;
    }
    let obj = ctx
        .snapshot
        .level
        .objects
        .iter()
        .filter(|o| danger_at(&ctx.snapshot, o.pos) <= ctx.danger_tolerance())
        .max_by_key(|o| (o.value, -ctx.snapshot.pos.distance(o.pos)))?
        .clone();

    if ctx.snapshot.pos == obj.pos {
        ctx.note("picking up");
        return Some(Action::Key(','));
    }
    let step = services.path.next_step(&ctx.snapshot, FlowGoal::Tile(obj.pos))?;
    ctx.goal.kind = GoalKind::Take;
    ctx.goal.target = Some(obj.pos);
    Some(Action::Move(step))
}

/// Hunt the best risk-adjusted kill.
pub fn kill(ctx: &mut EngineContext, services: &mut Services) -> Option<Action> {
    let tolerance = ctx.danger_tolerance();
    let target = ctx
        .snapshot
        .level
        .monsters
        .iter()
        .filter(|m| m.kill_value > 0 && m.expected_damage <= tolerance)
        .filter(|m| m.awake || ctx.snapshot.pos.distance(m.pos) <= 3)
        .max_by_key(|m| m.kill_value - m.expected_damage)?
        .clone();

    let step = services
        .path
        .next_step(&ctx.snapshot, FlowGoal::Tile(target.pos))?;
    ctx.goal.kind = GoalKind::Kill;
    ctx.goal.target = Some(target.pos);
    Some(Action::Move(step))
}

/// Push the frontier back.
pub fn explore(ctx: &mut EngineContext, services: &mut Services) -> Option<Action> {
    if ctx.snapshot.level.unexplored == 0 {
        return None;
    }
    let step = services.path.next_step(&ctx.snapshot, FlowGoal::Unexplored)?;
    ctx.goal.kind = GoalKind::Explore;
    Some(Action::Move(step))
}

/// Head for stairs: up when fleeing, down when ready for more.
pub fn stairs(ctx: &mut EngineContext, services: &mut Services) -> Option<Action> {
    let depth = ctx.snapshot.player.depth;

    let goal = if ctx.goal.fleeing || ctx.goal.seek_upstairs {
        FlowGoal::StairsUp
    } else if ctx.goal.leaving {
        FlowGoal::AnyStairs
    } else {
        let next = depth + 1;
        if ctx.config.stop_depth > 0 && next > ctx.config.stop_depth {
            return None;
        }
        if let Some(reason) = prepared(&ctx.snapshot, next) {
            if !ctx.goal.scumming {
                ctx.note(format!("not diving: {reason}"));
                return None;
            }
        }
        FlowGoal::StairsDown
    };

    // Already standing on a usable stair?
    let here = ctx.snapshot.level.feature_at(ctx.snapshot.pos);
    let usable = match goal {
        FlowGoal::StairsUp => here == Feature::StairsUp,
        FlowGoal::StairsDown => here == Feature::StairsDown,
        FlowGoal::AnyStairs => matches!(here, Feature::StairsUp | Feature::StairsDown),
        _ => false,
    };
    if usable {
        ctx.note("taking the stairs");
        return Some(Action::Key(if here == Feature::StairsUp { '<' } else { '>' }));
    }

    let step = services.path.next_step(&ctx.snapshot, goal)?;
    ctx.goal.kind = GoalKind::Flee;
    Some(Action::Move(step))
}
