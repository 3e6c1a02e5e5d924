//! Balance store abstraction

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use rh_core::{Credits, PlayerId, RhError, RhResult};

/// Key-value balance storage accessed through get / compare-and-set.
///
/// The ledger funnels every mutation through `compare_and_swap`; a store
/// only has to make that one operation atomic per key. Transient I/O faults
/// surface as `StorageUnavailable`.
pub trait BalanceStore: Send + Sync {
    /// Current balance, or `AccountNotFound`.
    fn balance(&self, player: &PlayerId) -> RhResult<Credits>;

    /// Atomically replace `expected` with `new`. `Ok(false)` means another
    /// writer got there first and nothing was changed.
    fn compare_and_swap(
        &self,
        player: &PlayerId,
        expected: Credits,
        new: Credits,
    ) -> RhResult<bool>;

    /// Create an account with an opening balance.
    fn create_account(&self, player: PlayerId, opening: Credits) -> RhResult<()>;
}

impl<T: BalanceStore + ?Sized> BalanceStore for Arc<T> {
    fn balance(&self, player: &PlayerId) -> RhResult<Credits> {
        (**self).balance(player)
    }

    fn compare_and_swap(
        &self,
        player: &PlayerId,
        expected: Credits,
        new: Credits,
    ) -> RhResult<bool> {
        (**self).compare_and_swap(player, expected, new)
    }

    fn create_account(&self, player: PlayerId, opening: Credits) -> RhResult<()> {
        (**self).create_account(player, opening)
    }
}

/// In-process store backed by a parking_lot map.
///
/// A production deployment swaps this for the real account storage behind
/// the same trait; the write lock makes the compare-and-swap atomic here.
#[derive(Debug, Default)]
pub struct InMemoryBalanceStore {
    balances: RwLock<HashMap<PlayerId, Credits>>,
}

impl InMemoryBalanceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BalanceStore for InMemoryBalanceStore {
    fn balance(&self, player: &PlayerId) -> RhResult<Credits> {
        self.balances
            .read()
            .get(player)
            .copied()
            .ok_or_else(|| RhError::AccountNotFound(player.clone()))
    }

    fn compare_and_swap(
        &self,
        player: &PlayerId,
        expected: Credits,
        new: Credits,
    ) -> RhResult<bool> {
        let mut balances = self.balances.write();
        let balance = balances
            .get_mut(player)
            .ok_or_else(|| RhError::AccountNotFound(player.clone()))?;
        if *balance != expected {
            return Ok(false);
        }
        *balance = new;
        Ok(true)
    }

    fn create_account(&self, player: PlayerId, opening: Credits) -> RhResult<()> {
        let mut balances = self.balances.write();
        if balances.contains_key(&player) {
            return Err(RhError::AccountExists(player));
        }
        log::info!("account {player} opened with {opening} credits");
        balances.insert(player, opening);
        Ok(())
    }
}
