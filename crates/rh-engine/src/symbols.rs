//! Symbol definitions and reel strips

use serde::{Deserialize, Serialize};

/// The closed symbol set.
///
/// Four ordinary paying symbols plus wild and scatter. The ordinary symbols
/// keep the legacy wire names deployed clients already parse, so their serde
/// names differ from the Rust identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    #[serde(rename = "nam")]
    Cherry,
    #[serde(rename = "emil")]
    Lemon,
    #[serde(rename = "henrik")]
    Bell,
    #[serde(rename = "bilka")]
    Diamond,
    /// Matches any ordinary symbol in an active streak.
    Wild,
    /// Breaks line streaks; in sufficient count anywhere, awards free spins.
    Scatter,
}

impl Symbol {
    /// The ordinary (non-special) symbols, in paytable order.
    pub const ORDINARY: [Symbol; 4] = [
        Symbol::Cherry,
        Symbol::Lemon,
        Symbol::Bell,
        Symbol::Diamond,
    ];

    pub fn is_wild(self) -> bool {
        self == Symbol::Wild
    }

    pub fn is_scatter(self) -> bool {
        self == Symbol::Scatter
    }

    pub fn is_ordinary(self) -> bool {
        !self.is_wild() && !self.is_scatter()
    }

    /// Lower-case wire name, matching the serde representation.
    pub fn name(self) -> &'static str {
        match self {
            Symbol::Cherry => "nam",
            Symbol::Lemon => "emil",
            Symbol::Bell => "henrik",
            Symbol::Diamond => "bilka",
            Symbol::Wild => "wild",
            Symbol::Scatter => "scatter",
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A weighted, shuffled reel strip for one column.
///
/// Built once per column configuration by [`crate::reels::ReelStripBuilder`]
/// and immutable thereafter; a spin reads a contiguous 5-symbol window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelStrip {
    symbols: Vec<Symbol>,
}

impl ReelStrip {
    /// Construction goes through the builder so a strip is never empty.
    pub(crate) fn new(symbols: Vec<Symbol>) -> Self {
        debug_assert!(!symbols.is_empty());
        Self { symbols }
    }

    /// Symbol at a position, wrapping around the strip end.
    pub fn symbol_at(&self, position: usize) -> Symbol {
        self.symbols[position % self.symbols.len()]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Occurrences of a symbol on the strip.
    pub fn count_of(&self, symbol: Symbol) -> usize {
        self.symbols.iter().filter(|&&s| s == symbol).count()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }
}
