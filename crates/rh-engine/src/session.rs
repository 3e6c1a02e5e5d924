//! Free-spin session state machine

use rh_core::{Credits, RhError, RhResult};
use serde::{Deserialize, Serialize};

use crate::paytable::SpinOutcome;

/// Effective stake for one spin after the session has resolved it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveBet {
    pub amount: Credits,
    /// True when the spin consumes a free spin (no reservation is made).
    pub is_free_spin: bool,
}

/// Per-player free-spin state.
///
/// Idle: no spins remaining, the player selects the bet freely. Active:
/// spins remain and the bet is fixed to the stake that triggered them.
/// Invariant: `locked_bet` is set iff `remaining > 0`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FreeSpinSession {
    remaining: u32,
    locked_bet: Option<Credits>,
}

impl FreeSpinSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn locked_bet(&self) -> Option<Credits> {
        self.locked_bet
    }

    /// Locked bet while active, the caller's stake otherwise.
    ///
    /// Zero is never a valid bet. While active, bet selection is locked: a
    /// request equal to the locked stake resolves normally (clients keep
    /// submitting the stake they see), anything else is `InvalidWager`.
    pub fn resolve_effective_bet(&self, requested: Credits) -> RhResult<EffectiveBet> {
        if requested == 0 {
            return Err(RhError::InvalidWager("bet must be positive".into()));
        }
        match self.locked_bet {
            Some(locked) => {
                if requested != locked {
                    return Err(RhError::InvalidWager(format!(
                        "bet selection is locked at {locked} during free spins"
                    )));
                }
                Ok(EffectiveBet {
                    amount: locked,
                    is_free_spin: true,
                })
            }
            None => Ok(EffectiveBet {
                amount: requested,
                is_free_spin: false,
            }),
        }
    }

    /// Advance the state machine with one spin's outcome.
    ///
    /// `bet` is the effective stake the spin was played at; it becomes the
    /// locked bet when the spin starts a session. An active spin always
    /// consumes one remaining spin; new awards stack additively with no cap.
    pub fn apply(&mut self, bet: Credits, outcome: &SpinOutcome) {
        let awarded = outcome.free_spins_awarded;
        if self.is_active() {
            self.remaining -= 1;
            if outcome.awards_free_spins() {
                log::info!("free spins retriggered: +{awarded}");
                self.remaining += awarded;
            }
            if self.remaining == 0 {
                log::info!("free-spin session complete, bet unlocked");
                self.locked_bet = None;
            }
        } else if outcome.awards_free_spins() {
            log::info!("free-spin session started: {awarded} spins, bet locked at {bet}");
            self.remaining = awarded;
            self.locked_bet = Some(bet);
        }
        debug_assert_eq!(self.locked_bet.is_some(), self.remaining > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{REELS, ROWS};
    use crate::spin::Grid;
    use crate::symbols::Symbol;

    fn outcome(awarded: u32) -> SpinOutcome {
        let filler = [[Symbol::Cherry; REELS]; ROWS];
        SpinOutcome {
            grid: Grid::from_rows(filler),
            bet: 20,
            total_win: 0,
            win_lines: Vec::new(),
            free_spins_awarded: awarded,
        }
    }

    #[test]
    fn idle_passes_the_requested_bet_through() {
        let session = FreeSpinSession::new();
        let eff = session.resolve_effective_bet(20).unwrap();
        assert_eq!(eff.amount, 20);
        assert!(!eff.is_free_spin);
    }

    #[test]
    fn zero_bet_is_rejected() {
        let session = FreeSpinSession::new();
        assert!(matches!(
            session.resolve_effective_bet(0),
            Err(RhError::InvalidWager(_))
        ));
    }

    #[test]
    fn award_locks_the_triggering_bet() {
        let mut session = FreeSpinSession::new();
        session.apply(20, &outcome(5));
        assert!(session.is_active());
        assert_eq!(session.remaining(), 5);
        assert_eq!(session.locked_bet(), Some(20));

        let eff = session.resolve_effective_bet(20).unwrap();
        assert_eq!(eff.amount, 20);
        assert!(eff.is_free_spin);
    }

    #[test]
    fn changing_the_bet_while_active_is_rejected() {
        let mut session = FreeSpinSession::new();
        session.apply(20, &outcome(5));
        assert!(matches!(
            session.resolve_effective_bet(50),
            Err(RhError::InvalidWager(_))
        ));
    }

    #[test]
    fn full_lifecycle_returns_to_idle() {
        let mut session = FreeSpinSession::new();
        session.apply(20, &outcome(5));

        for spin in 0..5 {
            assert!(session.is_active(), "spin {spin} should still be free");
            let eff = session.resolve_effective_bet(20).unwrap();
            assert_eq!(eff.amount, 20);
            session.apply(eff.amount, &outcome(0));
        }

        assert!(!session.is_active());
        assert_eq!(session.remaining(), 0);
        assert_eq!(session.locked_bet(), None);

        // Bet selection is free again.
        let eff = session.resolve_effective_bet(50).unwrap();
        assert_eq!(eff.amount, 50);
        assert!(!eff.is_free_spin);
    }

    #[test]
    fn retrigger_stacks_additively() {
        let mut session = FreeSpinSession::new();
        session.apply(20, &outcome(5));
        // Consume one, win 5 more: 5 - 1 + 5.
        session.apply(20, &outcome(5));
        assert_eq!(session.remaining(), 9);
        assert_eq!(session.locked_bet(), Some(20));
    }

    #[test]
    fn retrigger_on_the_last_spin_keeps_the_session_alive() {
        let mut session = FreeSpinSession::new();
        session.apply(20, &outcome(5));
        for _ in 0..4 {
            session.apply(20, &outcome(0));
        }
        assert_eq!(session.remaining(), 1);
        session.apply(20, &outcome(5));
        assert_eq!(session.remaining(), 5);
        assert_eq!(session.locked_bet(), Some(20));
    }

    #[test]
    fn idle_spin_without_award_stays_idle() {
        let mut session = FreeSpinSession::new();
        session.apply(20, &outcome(0));
        assert!(!session.is_active());
        assert_eq!(session.locked_bet(), None);
    }
}
