//! Caution proposers: retreat from overwhelming danger, rest when safe.

use crate::context::EngineContext;
use crate::host::{Action, FlowGoal};
use crate::snapshot::item::Tval;
use crate::snapshot::skills::Skill;
use crate::snapshot::sv;

use super::{danger::danger_here, find_pack, Services};

/// Fall back when the tile is hotter than the pilot will accept.
///
/// Preference order: teleport scroll, then a pathed step toward the
/// stairs. Suppressed while `no_retreat` runs down after a charge, and
/// while the escalation ladder has the pilot ignoring monsters.
pub fn retreat(ctx: &mut EngineContext, services: &mut Services) -> Option<Action> {
    if ctx.goal.ignoring || ctx.clock.no_retreat > 0 {
        return None;
    }
    let danger = danger_here(&ctx.snapshot);
    if danger <= ctx.danger_tolerance() {
        return None;
    }

    if let Some(idx) = find_pack(&ctx.snapshot, |i| {
        i.kind.tval == Tval::Scroll && i.kind.sval == sv::SCROLL_TELEPORT
    }) {
        ctx.note(format!("danger {danger}, teleporting away"));
        return Some(Action::UseItem(idx));
    }

    let step = services.path.next_step(&ctx.snapshot, FlowGoal::AnyStairs)?;
    ctx.goal.fleeing = true;
    ctx.note(format!("danger {danger}, retreating"));
    Some(Action::Move(step))
}

/// Rest HP and SP back when hurt and the coast is clear.
pub fn recover(ctx: &mut EngineContext, _services: &mut Services) -> Option<Action> {
    let skills = &ctx.snapshot.skills;
    let hurt = skills.get(Skill::CurHp) * 2 < skills.get(Skill::MaxHp)
        || (skills.get(Skill::MaxSp) > 0 && skills.get(Skill::CurSp) * 2 < skills.get(Skill::MaxSp));
    if !hurt || ctx.goal.fleeing {
        return None;
    }
    if danger_here(&ctx.snapshot) > 0 {
        return None;
    }
    ctx.note("resting to recover");
    Some(Action::Key('R'))
}
