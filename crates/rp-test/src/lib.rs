//! Test fixtures and harness pieces for the decision core.
//!
//! Provides canned snapshots, a recording [`rp_core::Host`], and a real
//! breadth-first [`rp_core::PathFinder`] over level memory, so integration
//! tests can drive whole sessions on synthetic maps.

pub mod fixtures;
pub mod grid;
pub mod host;

pub use fixtures::{dungeon_context, town_context};
pub use grid::GridPath;
pub use host::ScriptedHost;
