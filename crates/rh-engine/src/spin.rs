//! Spin sampling: stop positions and the 5×5 grid

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rh_core::RhResult;
use serde::{Deserialize, Serialize};

use crate::config::{ReelSetConfig, REELS, ROWS};
use crate::reels::ReelStripBuilder;
use crate::symbols::{ReelStrip, Symbol};

/// A fully populated 5×5 window, row-major.
///
/// Produced fresh per spin and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: [[Symbol; REELS]; ROWS],
}

impl Grid {
    pub fn from_rows(rows: [[Symbol; REELS]; ROWS]) -> Self {
        Self { rows }
    }

    pub fn cell(&self, row: usize, col: usize) -> Symbol {
        self.rows[row][col]
    }

    pub fn row(&self, row: usize) -> [Symbol; REELS] {
        self.rows[row]
    }

    pub fn rows(&self) -> &[[Symbol; REELS]; ROWS] {
        &self.rows
    }

    /// Occurrences of a symbol anywhere on the grid.
    pub fn count_of(&self, symbol: Symbol) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|&&s| s == symbol)
            .count()
    }
}

/// Samples five independent stop positions and reads the grid from five
/// immutable strips.
///
/// Generic over the RNG so tests can supply deterministic streams; the
/// default is an OS-seeded `StdRng`.
pub struct SpinEngine<R: Rng = StdRng> {
    strips: Vec<ReelStrip>,
    rng: R,
}

impl SpinEngine {
    /// Build the strips once from per-column weight tables.
    pub fn from_config(config: &ReelSetConfig) -> RhResult<Self> {
        Self::with_rng(config, StdRng::from_os_rng())
    }
}

impl<R: Rng> SpinEngine<R> {
    /// Build with an explicit RNG. The same source drives strip shuffling
    /// and stop sampling, so a seeded engine is fully reproducible.
    pub fn with_rng(config: &ReelSetConfig, mut rng: R) -> RhResult<Self> {
        let mut strips = Vec::with_capacity(REELS);
        for weights in &config.columns {
            strips.push(ReelStripBuilder::new(weights.clone())?.build(&mut rng));
        }
        Ok(Self { strips, rng })
    }

    /// Draw one stop per column and read 5 symbols downward, wrapping.
    pub fn spin(&mut self) -> Grid {
        let mut rows = [[Symbol::Cherry; REELS]; ROWS];
        for (col, strip) in self.strips.iter().enumerate() {
            let stop = self.rng.random_range(0..strip.len());
            for (offset, row) in rows.iter_mut().enumerate() {
                row[col] = strip.symbol_at(stop + offset);
            }
        }
        Grid::from_rows(rows)
    }

    pub fn strips(&self) -> &[ReelStrip] {
        &self.strips
    }
}

impl<R: Rng + SeedableRng> SpinEngine<R> {
    /// Reseed for reproducible stop sequences. Strips keep their existing
    /// shuffle; only future stop draws are affected.
    pub fn seed(&mut self, seed: u64) {
        self.rng = R::seed_from_u64(seed);
    }
}
