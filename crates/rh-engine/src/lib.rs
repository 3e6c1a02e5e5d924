//! # rh-engine — slot outcome engine for ReelHall
//!
//! Computes outcomes for a 5-reel, 5-row slot machine: weighted reel
//! construction, spin sampling, payline/scatter evaluation with wild
//! substitution, and the per-player free-spin state machine.
//!
//! ## Architecture
//!
//! ```text
//! ReelSetConfig (ordered symbol→weight tables, one per column)
//!     │
//!     v
//! ReelStripBuilder ──> ReelStrip × 5
//!     │
//!     v
//! SpinEngine::spin() ──> Grid (5×5, row-major)
//!     │
//!     v
//! PayTable::evaluate(grid, bet) ──> SpinOutcome
//!     │
//!     v
//! FreeSpinSession::apply(bet, outcome)
//! ```
//!
//! The engine and evaluator are pure per call; the session is the only
//! stateful piece and is owned per player by the caller.

pub mod config;
pub mod paytable;
pub mod reels;
pub mod session;
pub mod spin;
pub mod symbols;

pub use config::{ReelSetConfig, REELS, ROWS};
pub use paytable::{AllWildPolicy, PayTable, SpinOutcome, WinLine};
pub use reels::{ReelStripBuilder, ReelWeights};
pub use session::{EffectiveBet, FreeSpinSession};
pub use spin::{Grid, SpinEngine};
pub use symbols::{ReelStrip, Symbol};
