//! Last-chance wandering before the escalation ladder takes over.

use crate::context::EngineContext;
use crate::host::{Action, FlowGoal};

use super::Services;

/// Drift toward safer ground when nothing better presented itself. If even
/// this has nowhere to go, the table declines and the ladder engages.
pub fn wander(ctx: &mut EngineContext, services: &mut Services) -> Option<Action> {
    let step = services.path.next_step(&ctx.snapshot, FlowGoal::SafeTile)?;
    ctx.note("wandering");
    Some(Action::Move(step))
}
