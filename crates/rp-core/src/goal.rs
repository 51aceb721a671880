//! Persistent goal state and the turn clock.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::snapshot::terrain::Pos;

/// High-level goal category currently being pursued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
pub enum GoalKind {
    #[default]
    None,
    /// Walking toward a known object.
    Take,
    /// Walking toward a monster to fight.
    Kill,
    /// Walking toward unexplored or dark ground.
    Explore,
    /// Walking toward stairs or the level exit.
    Flee,
    /// Walking to a safe tile to rest on.
    Recover,
    /// Walking to a shop entrance.
    Shop,
    /// Digging an anti-summon corridor.
    Dig,
}

/// Goal state persists across turns until a proposer completes or clears it,
/// a level transition resets it, or the escalation ladder wipes it.
///
/// At most one shop/item/ware target triple is active at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalState {
    pub kind: GoalKind,
    /// Destination of the active flow, when one is running.
    pub target: Option<Pos>,
    /// Shop being visited for a trade.
    pub shop: Option<usize>,
    /// Inventory index being sold/stockpiled.
    pub item: Option<usize>,
    /// Ware index being bought/grabbed.
    pub ware: Option<usize>,
    pub fleeing: bool,
    pub leaving: bool,
    pub recalling: bool,
    /// Ignore monsters while fleeing (breeder floods and the like).
    pub ignoring: bool,
    /// Headed for the up stairs without taking them yet.
    pub seek_upstairs: bool,
    /// Diving sub-mode engaged.
    pub scumming: bool,
}

impl GoalState {
    /// Reset everything to neutral. Level change, respawn, escalation wipe.
    pub fn reset(&mut self) {
        *self = GoalState::default();
    }

    /// Clear just the active trade target triple.
    pub fn clear_trade(&mut self) {
        self.shop = None;
        self.item = None;
        self.ware = None;
    }

    /// Clear the flow goal but keep the longer-lived flags.
    pub fn clear_flow(&mut self) {
        self.kind = GoalKind::None;
        self.target = None;
    }

    pub fn has_trade(&self) -> bool {
        self.shop.is_some() && (self.item.is_some() || self.ware.is_some())
    }
}

/// All the engine's counters in one value object with pure operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnClock {
    /// Monotonic game turn as the engine has observed it.
    pub turn: u32,
    /// Turn at which the current level was entered.
    pub level_began: u32,
    /// Turns spent on the current screen panel.
    pub panel_turns: u32,
    /// Turns during which retreat is suppressed after a charge.
    pub no_retreat: u32,
}

impl TurnClock {
    pub fn tick(&mut self) {
        self.turn += 1;
        self.panel_turns += 1;
        self.no_retreat = self.no_retreat.saturating_sub(1);
    }

    /// Turns spent on this level so far.
    pub fn turns_on_level(&self) -> u32 {
        self.turn.saturating_sub(self.level_began)
    }

    pub fn enter_level(&mut self) {
        self.level_began = self.turn;
        self.panel_turns = 0;
    }

    pub fn shift_panel(&mut self) {
        self.panel_turns = 0;
    }
}
