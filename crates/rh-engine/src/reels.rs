//! Weighted reel construction

use rand::seq::SliceRandom;
use rand::Rng;
use rh_core::{RhError, RhResult};
use serde::{Deserialize, Serialize};

use crate::symbols::{ReelStrip, Symbol};

/// Ordered symbol→weight table for one reel column.
///
/// An explicit list of pairs, never a map: strip composition must not
/// depend on incidental key iteration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReelWeights(pub Vec<(Symbol, u32)>);

impl ReelWeights {
    pub fn new(entries: Vec<(Symbol, u32)>) -> Self {
        Self(entries)
    }

    /// Sum of all weights = length of the resulting strip.
    pub fn total(&self) -> usize {
        self.0.iter().map(|&(_, w)| w as usize).sum()
    }

    /// Combined weight configured for a symbol (entries may repeat).
    pub fn weight_of(&self, symbol: Symbol) -> u32 {
        self.0
            .iter()
            .filter(|&&(s, _)| s == symbol)
            .map(|&(_, w)| w)
            .sum()
    }
}

/// Turns a weight table into a shuffled strip.
///
/// Each symbol appears exactly `weight` times; the multiset is permuted
/// uniformly at random (Fisher–Yates, via `SliceRandom::shuffle`).
#[derive(Debug, Clone)]
pub struct ReelStripBuilder {
    weights: ReelWeights,
}

impl ReelStripBuilder {
    pub fn new(weights: ReelWeights) -> RhResult<Self> {
        if weights.total() == 0 {
            return Err(RhError::Config(
                "reel weight table has zero total weight".into(),
            ));
        }
        Ok(Self { weights })
    }

    /// Build a fresh strip. No shared state; each call returns a new strip.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> ReelStrip {
        let mut symbols = Vec::with_capacity(self.weights.total());
        for &(symbol, weight) in &self.weights.0 {
            for _ in 0..weight {
                symbols.push(symbol);
            }
        }
        symbols.shuffle(rng);
        ReelStrip::new(symbols)
    }
}
