//! Engine-wide constants.

/// Number of carried pack slots.
pub const PACK_SLOTS: usize = 23;

/// Ware slots per shop (and in the home).
pub const WARE_SLOTS: usize = 24;

/// Number of real shops; the home pseudo-shop sits one past them.
pub const SHOP_COUNT: usize = 6;

/// Index of the home pseudo-shop.
pub const HOME: usize = SHOP_COUNT;

/// Largest quantity a single slot may hold.
pub const MAX_STACK: u16 = 40;

/// Game clock values at which the driver re-syncs its cached views.
pub const CLOCK_RESYNC_AT: [u32; 2] = [12_000, 25_000];

/// Game clock value past which the session is abandoned as wrapped.
pub const CLOCK_OVERFLOW_AT: u32 = 30_000;

/// Turns on one level before boredom forces leaving.
pub const BOREDOM_TURNS: u32 = 10_000;

/// Panel-clock threshold that clears goals (first anti-bounce step).
pub const PANEL_CLEAR_GOALS: u32 = 300;

/// Panel-clock threshold that wipes monster/object memory.
pub const PANEL_WIPE_MEMORY: u32 = 500;

/// Panel-clock threshold that forces fleeing the level.
pub const PANEL_FORCE_FLEE: u32 = 700;

/// Escalation rungs after a declined baseline pass; the last rung is the
/// goal and memory wipe.
pub const ESCALATION_RUNGS: u8 = 3;
