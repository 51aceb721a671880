//! Autonomous decision core for a roguelike-playing pilot.
//!
//! The crate is a pure decision engine: sensing collaborators fill in a
//! [`snapshot::WorldSnapshot`], the [`driver`] runs one arbitration pass per
//! turn, and at most one [`host::Action`] goes back out through the
//! [`host::Host`] trait. Everything in between is deterministic for a given
//! snapshot, config, and seed.
//!
//! The moving parts:
//!
//! - [`power`] reduces a snapshot to one comparable utility number, and
//!   scores the home stockpile separately.
//! - [`sandbox`] answers "what if" questions by mutating scoped slots,
//!   re-evaluating, and restoring exactly.
//! - [`planner`] picks the single best town trade through sandbox trials.
//! - [`arbitrate`] holds the prioritized proposer tables and the
//!   escalation ladder behind them.
//! - [`driver`] owns clocks, refreshes, and stop conditions.

pub mod arbitrate;
pub mod config;
pub mod consts;
pub mod context;
pub mod driver;
pub mod goal;
pub mod host;
pub mod planner;
pub mod power;
pub mod prepared;
pub mod rng;
pub mod sandbox;
pub mod snapshot;

pub use config::PilotConfig;
pub use context::EngineContext;
pub use driver::{run_one_turn, TurnOutcome};
pub use host::{Action, Direction, FlowGoal, Host, PathFinder};
pub use snapshot::WorldSnapshot;
