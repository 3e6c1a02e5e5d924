//! # rh-ledger — atomic wager settlement for ReelHall
//!
//! Reserves a bet and settles a win against a player balance that many
//! requests may touch concurrently. Reservation is a single atomic
//! read-and-conditionally-decrement against the store, never a separate
//! read followed by a separate write; a failed settle credits the stake
//! back before the error surfaces.

pub mod ledger;
pub mod store;

pub use ledger::{Reservation, WagerLedger};
pub use store::{BalanceStore, InMemoryBalanceStore};
