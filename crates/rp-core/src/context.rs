//! The engine context threaded through every proposer and evaluator.

use serde::{Deserialize, Serialize};

use crate::config::PilotConfig;
use crate::goal::{GoalState, TurnClock};
use crate::rng::PilotRng;
use crate::snapshot::item::ItemKind;
use crate::snapshot::WorldSnapshot;

/// Cap on retained diagnostic notes.
const NOTE_CAPACITY: usize = 512;

/// Diagnostic note channel. Internal commentary only, never part of the
/// decision contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Notes {
    entries: Vec<String>,
}

impl Notes {
    pub fn push(&mut self, msg: impl Into<String>) {
        if self.entries.len() == NOTE_CAPACITY {
            self.entries.remove(0);
        }
        self.entries.push(msg.into());
    }

    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

/// Remembers trades made during the current town visit so the planner never
/// buys back what it just sold (and vice versa).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeLedger {
    sold: Vec<(ItemKind, usize)>,
    bought: Vec<(ItemKind, usize)>,
}

impl TradeLedger {
    pub fn record_sale(&mut self, kind: ItemKind, shop: usize) {
        self.sold.push((kind, shop));
    }

    pub fn record_purchase(&mut self, kind: ItemKind, shop: usize) {
        self.bought.push((kind, shop));
    }

    pub fn sold_to(&self, kind: ItemKind, shop: usize) -> bool {
        self.sold.iter().any(|&(k, s)| k == kind && s == shop)
    }

    pub fn bought_from(&self, kind: ItemKind, shop: usize) -> bool {
        self.bought.iter().any(|&(k, s)| k == kind && s == shop)
    }

    /// A fresh visit forgets the old ledgers.
    pub fn reset(&mut self) {
        self.sold.clear();
        self.bought.clear();
    }
}

/// Everything the engine mutates, in one struct passed by reference.
///
/// Single-writer discipline: the turn driver refreshes the snapshot, the
/// currently-running proposer owns the goal state, and the sandbox is the
/// only sanctioned trial mutator of the item containers.
#[derive(Debug, Clone)]
pub struct EngineContext {
    pub snapshot: WorldSnapshot,
    pub goal: GoalState,
    pub clock: TurnClock,
    pub config: PilotConfig,
    pub ledger: TradeLedger,
    pub notes: Notes,
    pub rng: PilotRng,
    /// Cached baseline power for the current turn.
    pub power: i64,
    /// Current escalation rung, 0 at baseline bravery.
    pub bravery: u8,
    /// HP value the danger cache was computed against; a change invalidates
    /// cached danger judgements.
    pub avoidance: i32,
    /// Set once the host reports the session over.
    pub session_over: bool,
    /// Depth observed on the previous turn; a change means a new level.
    pub depth_seen: Option<i32>,
}

impl EngineContext {
    pub fn new(config: PilotConfig, seed: u64) -> Self {
        EngineContext {
            snapshot: WorldSnapshot::new(),
            goal: GoalState::default(),
            clock: TurnClock::default(),
            config,
            ledger: TradeLedger::default(),
            notes: Notes::default(),
            rng: PilotRng::new(seed),
            power: 0,
            bravery: 0,
            avoidance: 0,
            session_over: false,
            depth_seen: None,
        }
    }

    pub fn note(&mut self, msg: impl Into<String>) {
        self.notes.push(msg);
    }

    /// Danger the pilot will currently accept, derived from HP, config risk,
    /// and the escalation rung.
    pub fn danger_tolerance(&self) -> i32 {
        let hp = self.snapshot.player.cur_hp.max(1);
        let mut percent = self.config.risk_percent
            + self.config.bravery_step_percent * self.bravery as i32;
        if self.config.plays_risky {
            percent += 20;
        }
        hp * percent / 100
    }

    /// Called when the host signals a level change or respawn.
    pub fn on_level_change(&mut self) {
        self.goal.reset();
        self.snapshot.level.wipe();
        self.clock.enter_level();
        self.bravery = 0;
    }

    /// Called on entering town: trade ledgers start fresh.
    pub fn on_town_entry(&mut self) {
        self.ledger.reset();
    }
}
