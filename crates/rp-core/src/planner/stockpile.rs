//! Home stockpile optimizer.
//!
//! Given the expendable pack items, decide which deposits raise the home
//! score the most. Two search strategies share one evaluation: a greedy
//! single-substitution sweep (the default) and an exhaustive subset search
//! used as the slow-but-sure option on small candidate sets.

use crate::config::{HomeOptimizer, PilotConfig};
use crate::consts::HOME;
use crate::power::home::{score, tally_wares};
use crate::snapshot::item::Item;
use crate::snapshot::WorldSnapshot;

use super::junk;

/// Exhaustive search is only attempted below this candidate count; above
/// it the greedy sweep runs regardless of config.
const EXHAUSTIVE_LIMIT: usize = 12;

/// One planned deposit: a pack index and the score it adds when applied in
/// plan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deposit {
    pub inv_idx: usize,
    pub gain: i64,
}

fn score_wares(wares: &[Item]) -> i64 {
    score(&tally_wares(wares))
}

/// Place one copy into a working ware array. False when nothing fits.
fn insert_copy(wares: &mut [Item], item: &Item) -> bool {
    let mut one = item.clone();
    one.quantity = 1;
    if let Some(slot) = wares.iter().position(|w| w.can_merge(&one)) {
        wares[slot].merge(one);
        return true;
    }
    if let Some(slot) = wares.iter().position(|w| w.is_empty()) {
        wares[slot] = one;
        return true;
    }
    false
}

/// Greedy sweep: repeatedly apply the single best-scoring deposit until no
/// deposit improves the score.
fn greedy(wares: &[Item], candidates: &[(usize, Item)]) -> Vec<Deposit> {
    let mut wares = wares.to_vec();
    let mut remaining: Vec<(usize, Item)> = candidates.to_vec();
    let mut plan = Vec::new();
    let mut current = score_wares(&wares);

    loop {
        let mut best: Option<(usize, i64)> = None;
        for (slot, (_, item)) in remaining.iter().enumerate() {
            let mut trial = wares.clone();
            if !insert_copy(&mut trial, item) {
                continue;
            }
            let gain = score_wares(&trial) - current;
            if gain > 0 && best.map_or(true, |(_, g)| gain > g) {
                best = Some((slot, gain));
            }
        }
        let Some((slot, gain)) = best else { break };
        let (inv_idx, item) = remaining.remove(slot);
        insert_copy(&mut wares, &item);
        current += gain;
        plan.push(Deposit { inv_idx, gain });
    }
    plan
}

/// Exhaustive subset search: every order-insensitive combination of one
/// copy per candidate, best final score wins. Deposits are then reported
/// in descending individual-gain order.
fn exhaustive(wares: &[Item], candidates: &[(usize, Item)]) -> Vec<Deposit> {
    fn descend(
        wares: &mut Vec<Item>,
        candidates: &[(usize, Item)],
        next: usize,
        chosen: &mut Vec<usize>,
        best: &mut (i64, Vec<usize>),
    ) {
        let here = score_wares(wares);
        if here > best.0 {
            *best = (here, chosen.clone());
        }
        for idx in next..candidates.len() {
            let mut trial = wares.clone();
            if !insert_copy(&mut trial, &candidates[idx].1) {
                continue;
            }
            chosen.push(idx);
            descend(&mut trial, candidates, idx + 1, chosen, best);
            chosen.pop();
        }
    }

    let mut working = wares.to_vec();
    let mut best = (score_wares(&working), Vec::new());
    descend(&mut working, candidates, 0, &mut Vec::new(), &mut best);

    // Replay the winning subset to attribute per-deposit gains.
    let mut wares = wares.to_vec();
    let mut current = score_wares(&wares);
    let mut plan: Vec<Deposit> = best
        .1
        .iter()
        .map(|&idx| {
            let (inv_idx, item) = &candidates[idx];
            insert_copy(&mut wares, item);
            let after = score_wares(&wares);
            let gain = after - current;
            current = after;
            Deposit {
                inv_idx: *inv_idx,
                gain,
            }
        })
        .collect();
    plan.sort_by_key(|d| std::cmp::Reverse(d.gain));
    plan
}

/// Deposits that raise the home score, best first.
///
/// Candidates are the expendable pack items (losing one copy costs no
/// power), so the plan never trades away carried capability.
pub fn plan_deposits(snap: &mut WorldSnapshot, cfg: &PilotConfig) -> Vec<Deposit> {
    let candidates: Vec<(usize, Item)> = junk::useless_indices(snap, cfg)
        .into_iter()
        .map(|idx| (idx, snap.inventory[idx].clone()))
        .collect();
    if candidates.is_empty() {
        return Vec::new();
    }

    let wares = snap.shops[HOME].ware.clone();
    match cfg.home_optimizer {
        HomeOptimizer::Exhaustive if candidates.len() <= EXHAUSTIVE_LIMIT => {
            exhaustive(&wares, &candidates)
        }
        _ => greedy(&wares, &candidates),
    }
}
