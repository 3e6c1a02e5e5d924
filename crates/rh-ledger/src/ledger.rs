//! Wager reservation and settlement

use rh_core::{Credits, PlayerId, RhError, RhResult};

use crate::store::BalanceStore;

/// Conditional-update attempts before `LedgerConflict` surfaces. The caller
/// retries the reserve step, never the spin itself.
const MAX_SWAP_ATTEMPTS: u32 = 16;

/// Proof that a stake was debited (or deliberately skipped for a free spin).
///
/// Consumed by value in `settle` and `rollback`, so a reservation settles
/// exactly once.
#[derive(Debug)]
pub struct Reservation {
    player: PlayerId,
    amount: Credits,
}

impl Reservation {
    pub fn player(&self) -> &PlayerId {
        &self.player
    }

    /// Amount debited; zero for a free-spin handle.
    pub fn amount(&self) -> Credits {
        self.amount
    }
}

/// Atomically debits a bet and credits a win against the balance store.
pub struct WagerLedger<S> {
    store: S,
}

impl<S: BalanceStore> WagerLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Debit `amount`, or fail without touching the balance.
    ///
    /// The debit is a single conditional decrement: two concurrent reserves
    /// can never both succeed against the same stale reading, and a
    /// reservation never drives the balance negative.
    pub fn reserve(&self, player: &PlayerId, amount: Credits) -> RhResult<Reservation> {
        if amount == 0 {
            return Err(RhError::InvalidWager("cannot reserve a zero stake".into()));
        }
        for _ in 0..MAX_SWAP_ATTEMPTS {
            let balance = self.store.balance(player)?;
            if balance < amount {
                return Err(RhError::InsufficientFunds {
                    balance,
                    needed: amount,
                });
            }
            if self
                .store
                .compare_and_swap(player, balance, balance - amount)?
            {
                log::debug!(
                    "reserved {amount} from {player}: {balance} -> {}",
                    balance - amount
                );
                return Ok(Reservation {
                    player: player.clone(),
                    amount,
                });
            }
        }
        Err(RhError::LedgerConflict)
    }

    /// Zero-stake handle for a spin that consumes a free spin. `settle` can
    /// still credit against it; rolling it back restores nothing.
    pub fn skip_reserve(&self, player: &PlayerId) -> RhResult<Reservation> {
        // The account must exist even when nothing is debited.
        self.store.balance(player)?;
        Ok(Reservation {
            player: player.clone(),
            amount: 0,
        })
    }

    /// Credit the win and return the new balance.
    ///
    /// If the store fails here, the reserved stake is credited back before
    /// the error surfaces, so no request debits without a compensating
    /// credit.
    pub fn settle(&self, reservation: Reservation, win: Credits) -> RhResult<Credits> {
        let Reservation { player, amount } = reservation;
        match self.credit(&player, win) {
            Ok(balance) => Ok(balance),
            Err(err) => {
                log::warn!("settle for {player} failed ({err}), rolling back stake {amount}");
                if let Err(rollback_err) = self.credit(&player, amount) {
                    log::error!("rollback of {amount} for {player} failed: {rollback_err}");
                    return Err(rollback_err);
                }
                Err(err)
            }
        }
    }

    /// Undo a reservation that will never settle.
    pub fn rollback(&self, reservation: Reservation) -> RhResult<Credits> {
        let Reservation { player, amount } = reservation;
        log::debug!("rolling back reservation of {amount} for {player}");
        self.credit(&player, amount)
    }

    pub fn balance(&self, player: &PlayerId) -> RhResult<Credits> {
        self.store.balance(player)
    }

    fn credit(&self, player: &PlayerId, amount: Credits) -> RhResult<Credits> {
        if amount == 0 {
            return self.store.balance(player);
        }
        for _ in 0..MAX_SWAP_ATTEMPTS {
            let balance = self.store.balance(player)?;
            if self
                .store
                .compare_and_swap(player, balance, balance + amount)?
            {
                return Ok(balance + amount);
            }
        }
        Err(RhError::LedgerConflict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryBalanceStore;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;

    fn funded(player: &PlayerId, balance: Credits) -> WagerLedger<InMemoryBalanceStore> {
        let store = InMemoryBalanceStore::new();
        store.create_account(player.clone(), balance).unwrap();
        WagerLedger::new(store)
    }

    #[test]
    fn reserve_debits_and_settle_credits() {
        let player = PlayerId::from("alice");
        let ledger = funded(&player, 100);

        let reservation = ledger.reserve(&player, 30).unwrap();
        assert_eq!(ledger.balance(&player).unwrap(), 70);

        let balance = ledger.settle(reservation, 60).unwrap();
        assert_eq!(balance, 130);
    }

    #[test]
    fn zero_win_settle_leaves_balance_at_post_reserve_value() {
        let player = PlayerId::from("alice");
        let ledger = funded(&player, 100);

        let reservation = ledger.reserve(&player, 30).unwrap();
        let balance = ledger.settle(reservation, 0).unwrap();
        assert_eq!(balance, 70);
    }

    #[test]
    fn insufficient_funds_leaves_balance_untouched() {
        let player = PlayerId::from("alice");
        let ledger = funded(&player, 20);

        let err = ledger.reserve(&player, 30).unwrap_err();
        assert!(matches!(
            err,
            RhError::InsufficientFunds {
                balance: 20,
                needed: 30
            }
        ));
        assert_eq!(ledger.balance(&player).unwrap(), 20);
    }

    #[test]
    fn zero_stake_reserve_is_invalid() {
        let player = PlayerId::from("alice");
        let ledger = funded(&player, 100);
        assert!(matches!(
            ledger.reserve(&player, 0),
            Err(RhError::InvalidWager(_))
        ));
    }

    #[test]
    fn rollback_restores_the_stake() {
        let player = PlayerId::from("alice");
        let ledger = funded(&player, 100);

        let reservation = ledger.reserve(&player, 40).unwrap();
        assert_eq!(ledger.balance(&player).unwrap(), 60);
        assert_eq!(ledger.rollback(reservation).unwrap(), 100);
    }

    #[test]
    fn skip_reserve_debits_nothing_but_settles_wins() {
        let player = PlayerId::from("alice");
        let ledger = funded(&player, 100);

        let handle = ledger.skip_reserve(&player).unwrap();
        assert_eq!(handle.amount(), 0);
        assert_eq!(ledger.balance(&player).unwrap(), 100);

        let balance = ledger.settle(handle, 50).unwrap();
        assert_eq!(balance, 150);
    }

    #[test]
    fn skip_reserve_requires_an_account() {
        let ledger = WagerLedger::new(InMemoryBalanceStore::new());
        assert!(matches!(
            ledger.skip_reserve(&PlayerId::from("ghost")),
            Err(RhError::AccountNotFound(_))
        ));
    }

    /// Store wrapper whose next conditional update fails once, to exercise
    /// the settle-side rollback path.
    struct FailOnceStore {
        inner: InMemoryBalanceStore,
        fail_next_swap: AtomicBool,
    }

    impl FailOnceStore {
        fn new(inner: InMemoryBalanceStore) -> Self {
            Self {
                inner,
                fail_next_swap: AtomicBool::new(false),
            }
        }

        fn arm(&self) {
            self.fail_next_swap.store(true, Ordering::SeqCst);
        }
    }

    impl BalanceStore for FailOnceStore {
        fn balance(&self, player: &PlayerId) -> RhResult<Credits> {
            self.inner.balance(player)
        }

        fn compare_and_swap(
            &self,
            player: &PlayerId,
            expected: Credits,
            new: Credits,
        ) -> RhResult<bool> {
            if self.fail_next_swap.swap(false, Ordering::SeqCst) {
                return Err(RhError::StorageUnavailable("injected write fault".into()));
            }
            self.inner.compare_and_swap(player, expected, new)
        }

        fn create_account(&self, player: PlayerId, opening: Credits) -> RhResult<()> {
            self.inner.create_account(player, opening)
        }
    }

    #[test]
    fn failed_settle_rolls_the_stake_back() {
        let player = PlayerId::from("alice");
        let inner = InMemoryBalanceStore::new();
        inner.create_account(player.clone(), 100).unwrap();
        let store = FailOnceStore::new(inner);
        let ledger = WagerLedger::new(store);

        let reservation = ledger.reserve(&player, 30).unwrap();
        assert_eq!(ledger.balance(&player).unwrap(), 70);

        ledger.store.arm();
        let err = ledger.settle(reservation, 60).unwrap_err();
        assert!(matches!(err, RhError::StorageUnavailable(_)));

        // Stake back, win not credited: no permanent debit without credit.
        assert_eq!(ledger.balance(&player).unwrap(), 100);
    }

    #[test]
    fn concurrent_reserves_never_oversell_the_balance() {
        let player = PlayerId::from("alice");
        let store = Arc::new(InMemoryBalanceStore::new());
        store.create_account(player.clone(), 100).unwrap();
        let ledger = Arc::new(WagerLedger::new(store));

        // 8 threads, bet 30 against balance 100: exactly 3 may succeed.
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                let player = player.clone();
                thread::spawn(move || loop {
                    match ledger.reserve(&player, 30) {
                        Ok(reservation) => break Some(reservation),
                        Err(RhError::LedgerConflict) => continue,
                        Err(_) => break None,
                    }
                })
            })
            .collect();

        let reservations: Vec<_> = handles
            .into_iter()
            .filter_map(|h| h.join().unwrap())
            .collect();

        assert_eq!(reservations.len(), 3);
        assert_eq!(ledger.balance(&player).unwrap(), 10);

        // Settle each with a known win; conservation must hold exactly.
        let mut credited = 0;
        for reservation in reservations {
            credited += 25;
            ledger.settle(reservation, 25).unwrap();
        }
        assert_eq!(ledger.balance(&player).unwrap(), 10 + credited);
    }
}
