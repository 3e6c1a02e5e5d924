//! Reel set configuration

use rh_core::{RhError, RhResult};
use serde::{Deserialize, Serialize};

use crate::reels::ReelWeights;
use crate::symbols::Symbol;

/// Number of reel columns.
pub const REELS: usize = 5;
/// Number of visible rows per reel.
pub const ROWS: usize = 5;

/// Per-column weight tables for the whole reel set.
///
/// Columns may carry different weights to bias volatility independently.
/// Built once at startup and passed into the engine explicitly; there is no
/// process-wide reel singleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelSetConfig {
    pub columns: [ReelWeights; REELS],
}

impl ReelSetConfig {
    /// Production reel set. Wild and scatter are rare; ordinary weights are
    /// nudged per column.
    pub fn standard() -> Self {
        let column = |cherry, lemon, bell, diamond| {
            ReelWeights::new(vec![
                (Symbol::Cherry, cherry),
                (Symbol::Lemon, lemon),
                (Symbol::Bell, bell),
                (Symbol::Diamond, diamond),
                (Symbol::Wild, 3),
                (Symbol::Scatter, 4),
            ])
        };
        Self {
            columns: [
                column(28, 28, 26, 26),
                column(26, 28, 28, 26),
                column(28, 26, 28, 26),
                column(27, 27, 27, 25),
                column(26, 26, 28, 28),
            ],
        }
    }

    /// Every column must be able to produce a strip.
    pub fn validate(&self) -> RhResult<()> {
        for (index, column) in self.columns.iter().enumerate() {
            if column.total() == 0 {
                return Err(RhError::Config(format!(
                    "reel column {index} has zero total weight"
                )));
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> RhResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| RhError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ReelSetConfig {
    fn default() -> Self {
        Self::standard()
    }
}
