//! Paytable and win evaluation

use rh_core::{Credits, RhError, RhResult};
use serde::{Deserialize, Serialize};

use crate::config::{REELS, ROWS};
use crate::spin::Grid;
use crate::symbols::Symbol;

/// Resolution for a winning row whose streak never locks past wild.
///
/// Deliberately carries no default, in code or serde: the integrator has to
/// pick one when building the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllWildPolicy {
    /// Wild is a valid resolved symbol; the row pays from the streak table.
    PayLine,
    /// The row pays nothing.
    Void,
}

/// Streak-keyed payout table plus the scatter and free-spin rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayTable {
    /// Multipliers for streaks of 3, 4 and 5 (index 0 = 3-of-a-kind).
    pub streak_multipliers: [Credits; 3],
    /// Scatters anywhere on the grid needed to award free spins.
    pub scatter_trigger: usize,
    /// Flat free-spin award when the trigger is met; never per extra scatter.
    pub free_spins_award: u32,
    /// All-wild row resolution.
    pub all_wild: AllWildPolicy,
}

impl PayTable {
    /// Production table: 3→2×, 4→5×, 5→10×; 3 scatters award 5 free spins.
    pub fn standard(all_wild: AllWildPolicy) -> Self {
        Self {
            streak_multipliers: [2, 5, 10],
            scatter_trigger: 3,
            free_spins_award: 5,
            all_wild,
        }
    }

    pub fn validate(&self) -> RhResult<()> {
        if self.scatter_trigger == 0 {
            return Err(RhError::Config("scatter trigger must be positive".into()));
        }
        Ok(())
    }

    fn multiplier(&self, streak: usize) -> Credits {
        self.streak_multipliers[streak.min(REELS) - 3]
    }

    /// Score a grid against a bet. Pure; no shared state, no side effects.
    pub fn evaluate(&self, grid: Grid, bet: Credits) -> SpinOutcome {
        let free_spins_awarded = if grid.count_of(Symbol::Scatter) >= self.scatter_trigger {
            self.free_spins_award
        } else {
            0
        };

        let mut win_lines = Vec::new();
        let mut total_win = 0;
        for row in 0..ROWS {
            if let Some(line) = self.evaluate_row(&grid, row, bet) {
                total_win += line.win;
                win_lines.push(line);
            }
        }

        SpinOutcome {
            grid,
            bet,
            total_win,
            win_lines,
            free_spins_awarded,
        }
    }

    /// Left-to-right scan of one row.
    ///
    /// Wild matches anything; the paying symbol locks to the first concrete
    /// symbol an all-wild-so-far streak meets. Scatter voids the row when
    /// leftmost, otherwise ends the scan.
    fn evaluate_row(&self, grid: &Grid, row: usize, bet: Credits) -> Option<WinLine> {
        let mut resolved = grid.cell(row, 0);
        if resolved.is_scatter() {
            return None;
        }

        let mut streak = 1usize;
        for col in 1..REELS {
            let cur = grid.cell(row, col);
            if cur.is_scatter() {
                break;
            }
            if !(cur == resolved || cur.is_wild() || resolved.is_wild()) {
                break;
            }
            if resolved.is_wild() && !cur.is_wild() {
                resolved = cur;
            }
            streak += 1;
        }

        if streak < 3 {
            return None;
        }
        if resolved.is_wild() && self.all_wild == AllWildPolicy::Void {
            return None;
        }

        Some(WinLine {
            row: row as u8,
            symbol: resolved,
            streak: streak as u8,
            win: bet * self.multiplier(streak),
        })
    }
}

/// A winning row. A row contributes at most one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLine {
    pub row: u8,
    /// The resolved paying symbol (post wild lock-in).
    pub symbol: Symbol,
    /// Matching streak length, 3–5.
    pub streak: u8,
    pub win: Credits,
}

/// Immutable result of scoring one grid against one bet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub grid: Grid,
    pub bet: Credits,
    pub total_win: Credits,
    pub win_lines: Vec<WinLine>,
    /// Free spins awarded by this spin (flat scatter award).
    pub free_spins_awarded: u32,
}

impl SpinOutcome {
    pub fn is_win(&self) -> bool {
        self.total_win > 0
    }

    pub fn awards_free_spins(&self) -> bool {
        self.free_spins_awarded > 0
    }
}
