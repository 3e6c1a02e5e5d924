//! Error types for ReelHall

use thiserror::Error;

use crate::types::{Credits, PlayerId};

/// Core error type
///
/// Every failure is scoped to a single round request; nothing here is fatal
/// to the process.
#[derive(Error, Debug)]
pub enum RhError {
    /// Bet of zero, or an attempt to change the stake while free spins
    /// have it locked.
    #[error("invalid wager: {0}")]
    InvalidWager(String),

    /// Reservation would drive the balance negative.
    #[error("insufficient funds: balance {balance}, needed {needed}")]
    InsufficientFunds { balance: Credits, needed: Credits },

    #[error("account not found: {0}")]
    AccountNotFound(PlayerId),

    #[error("account already exists: {0}")]
    AccountExists(PlayerId),

    /// A concurrent conditional update won the race repeatedly. The caller
    /// should retry the reserve step, not replay the spin.
    #[error("ledger conflict: concurrent balance update lost the race")]
    LedgerConflict,

    /// Transient store I/O failure during reserve or settle.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type alias
pub type RhResult<T> = Result<T, RhError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_funds_message_carries_amounts() {
        let err = RhError::InsufficientFunds {
            balance: 50,
            needed: 80,
        };
        let msg = err.to_string();
        assert!(msg.contains("50"));
        assert!(msg.contains("80"));
    }
}
