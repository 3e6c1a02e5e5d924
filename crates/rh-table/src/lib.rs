//! # rh-table — round orchestration for ReelHall
//!
//! Drives the full round sequence the request-handling layer calls into:
//! resolve the effective bet, reserve it (or skip for a free spin), spin,
//! evaluate, settle, update the session. The whole sequence runs under the
//! player's session lock, so a player's rounds are serialized while other
//! players proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rh_core::{Credits, PlayerId, RhError, RhResult};
use rh_engine::{AllWildPolicy, FreeSpinSession, PayTable, ReelSetConfig, SpinEngine, SpinOutcome};
use rh_ledger::{BalanceStore, WagerLedger};
use serde::{Deserialize, Serialize};

/// Opening balance granted on registration.
pub const OPENING_BALANCE: Credits = 1000;

/// Everything a table needs: reel weights plus the paytable.
///
/// Plain configuration data; any serialization with 1:1 field names works,
/// JSON is what ships.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    pub reels: ReelSetConfig,
    pub paytable: PayTable,
}

impl TableConfig {
    /// Production defaults. The all-wild policy has no default anywhere, so
    /// it is the one decision the integrator must make here.
    pub fn standard(all_wild: AllWildPolicy) -> Self {
        Self {
            reels: ReelSetConfig::standard(),
            paytable: PayTable::standard(all_wild),
        }
    }

    pub fn from_json(json: &str) -> RhResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| RhError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RhResult<()> {
        self.reels.validate()?;
        self.paytable.validate()
    }
}

/// One completed round, as returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct RoundResult {
    pub outcome: SpinOutcome,
    /// Balance after settlement.
    pub balance: Credits,
    pub free_spins_remaining: u32,
    /// True when this round consumed a free spin (nothing was debited).
    pub was_free_spin: bool,
}

/// Hands out one lock per player; that lock serializes the player's rounds.
#[derive(Default)]
struct SessionRegistry {
    sessions: Mutex<HashMap<PlayerId, Arc<Mutex<FreeSpinSession>>>>,
}

impl SessionRegistry {
    fn entry(&self, player: &PlayerId) -> Arc<Mutex<FreeSpinSession>> {
        self.sessions
            .lock()
            .entry(player.clone())
            .or_default()
            .clone()
    }
}

/// A game table: one engine, one paytable, one ledger, many players.
pub struct Table<S: BalanceStore> {
    engine: Mutex<SpinEngine>,
    paytable: PayTable,
    ledger: WagerLedger<Arc<S>>,
    store: Arc<S>,
    sessions: SessionRegistry,
}

impl<S: BalanceStore> Table<S> {
    pub fn new(config: TableConfig, store: Arc<S>) -> RhResult<Self> {
        config.validate()?;
        let engine = SpinEngine::from_config(&config.reels)?;
        Ok(Self::assemble(engine, config.paytable, store))
    }

    /// Deterministic variant for tests and replay tooling.
    pub fn with_seed(config: TableConfig, store: Arc<S>, seed: u64) -> RhResult<Self> {
        config.validate()?;
        let engine = SpinEngine::with_rng(&config.reels, StdRng::seed_from_u64(seed))?;
        Ok(Self::assemble(engine, config.paytable, store))
    }

    fn assemble(engine: SpinEngine, paytable: PayTable, store: Arc<S>) -> Self {
        Self {
            engine: Mutex::new(engine),
            paytable,
            ledger: WagerLedger::new(Arc::clone(&store)),
            store,
            sessions: SessionRegistry::default(),
        }
    }

    /// Open an account with the standard starting balance.
    pub fn register(&self, player: PlayerId) -> RhResult<()> {
        self.store.create_account(player, OPENING_BALANCE)
    }

    pub fn balance(&self, player: &PlayerId) -> RhResult<Credits> {
        self.ledger.balance(player)
    }

    /// Play one round for `player` at `requested_bet`.
    ///
    /// Reservation failure returns before anything is mutated; a settle-side
    /// storage failure rolls the stake back inside the ledger before the
    /// error reaches the caller. The session is only advanced once the
    /// money movement has fully completed.
    pub fn play(&self, player: &PlayerId, requested_bet: Credits) -> RhResult<RoundResult> {
        let entry = self.sessions.entry(player);
        let mut session = entry.lock();

        let effective = session.resolve_effective_bet(requested_bet)?;
        let reservation = if effective.is_free_spin {
            self.ledger.skip_reserve(player)?
        } else {
            self.ledger.reserve(player, effective.amount)?
        };

        let grid = self.engine.lock().spin();
        let outcome = self.paytable.evaluate(grid, effective.amount);

        let balance = self.ledger.settle(reservation, outcome.total_win)?;
        session.apply(effective.amount, &outcome);

        log::debug!(
            "round for {player}: bet {} win {} free_spins_left {} balance {balance}",
            effective.amount,
            outcome.total_win,
            session.remaining()
        );

        Ok(RoundResult {
            outcome,
            balance,
            free_spins_remaining: session.remaining(),
            was_free_spin: effective.is_free_spin,
        })
    }
}
