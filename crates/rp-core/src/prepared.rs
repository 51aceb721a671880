//! Depth preparedness: is the pilot equipped for a given depth?
//!
//! Returns the first unmet requirement as human-readable text, or `None`
//! when ready. The leave-level proposer uses `restock` to decide "must go
//! to town now".

use crate::snapshot::skills::Skill;
use crate::snapshot::WorldSnapshot;

/// First reason the pilot is not prepared for `depth`, if any.
pub fn prepared(snap: &WorldSnapshot, depth: i32) -> Option<String> {
    let s = &snap.skills;

    if depth <= 0 {
        return None;
    }

    if s.get(Skill::FoodCount) < 2 {
        return Some("need food".into());
    }
    if s.get(Skill::LightRadius) < 1 {
        return Some("need a light source".into());
    }
    if s.get(Skill::FuelCount) < 3 && s.get(Skill::LightRadius) <= 2 {
        return Some("need fuel".into());
    }
    if depth > 5 && s.get(Skill::RecallCount) < 1 {
        return Some("need recall".into());
    }
    if depth > 8 && s.get(Skill::MaxHp) < depth * 5 {
        return Some("need more hit points".into());
    }
    if depth > 10 && s.get(Skill::HealCount) < 2 {
        return Some("need healing potions".into());
    }
    if depth > 20 && !s.has(Skill::FreeAction) {
        return Some("need free action".into());
    }
    if depth > 20 && !s.has(Skill::SeeInvis) && !s.has(Skill::Telepathy) {
        return Some("need see invisible".into());
    }
    if depth > 30 && !s.has(Skill::ResPois) {
        return Some("need poison resistance".into());
    }
    if depth > 40
        && !(s.has(Skill::ResFire)
            && s.has(Skill::ResCold)
            && s.has(Skill::ResElec)
            && s.has(Skill::ResAcid))
    {
        return Some("need the basic resistances".into());
    }

    None
}

/// Stricter check for staying at the current depth: the pilot tolerates a
/// thinner margin while diving than it requires before descending further.
pub fn restock(snap: &WorldSnapshot, depth: i32) -> Option<String> {
    let s = &snap.skills;

    if depth <= 0 {
        return None;
    }
    if s.get(Skill::FoodCount) == 0 {
        return Some("out of food".into());
    }
    if s.get(Skill::LightRadius) == 0 {
        return Some("no light".into());
    }
    if depth > 5 && s.get(Skill::RecallCount) == 0 && s.get(Skill::FoodCount) < 2 {
        return Some("no recall and low food".into());
    }
    if depth > 15 && s.get(Skill::HealCount) == 0 && s.get(Skill::CurHp) < s.get(Skill::MaxHp) / 2
    {
        return Some("no healing and hurt".into());
    }
    None
}
