//! Dev table exerciser: register a player, play rounds, print outcomes.
//!
//! ```text
//! RUST_LOG=debug cargo run --bin rh_dev_cli -- --rounds 50 --bet 10 --seed 7
//! ```

use std::sync::Arc;

use clap::Parser;
use rh_core::PlayerId;
use rh_engine::AllWildPolicy;
use rh_ledger::InMemoryBalanceStore;
use rh_table::{Table, TableConfig};

#[derive(Parser)]
#[command(name = "rh-dev-cli", about = "ReelHall table exerciser")]
struct Args {
    /// Rounds to play (stops early on insufficient funds)
    #[arg(short = 'n', long, default_value_t = 20)]
    rounds: u32,

    /// Stake per round, in credits
    #[arg(short, long, default_value_t = 10)]
    bet: u64,

    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Treat an all-wild row as paying nothing instead of paying as wild
    #[arg(long)]
    void_all_wild: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let policy = if args.void_all_wild {
        AllWildPolicy::Void
    } else {
        AllWildPolicy::PayLine
    };
    let config = TableConfig::standard(policy);
    let store = Arc::new(InMemoryBalanceStore::new());
    let table = match args.seed {
        Some(seed) => Table::with_seed(config, store, seed)?,
        None => Table::new(config, store)?,
    };

    let player = PlayerId::from("dev");
    table.register(player.clone())?;
    println!("player {player} starts with {} credits", table.balance(&player)?);

    for round in 1..=args.rounds {
        match table.play(&player, args.bet) {
            Ok(result) => {
                for row in result.outcome.grid.rows() {
                    let cells: Vec<&str> = row.iter().map(|s| s.name()).collect();
                    println!("  {}", cells.join(" "));
                }
                let tag = if result.was_free_spin { " [free spin]" } else { "" };
                if result.outcome.is_win() {
                    println!(
                        "round {round}{tag}: win {} (lines: {}), free spins left {}, balance {}",
                        result.outcome.total_win,
                        result.outcome.win_lines.len(),
                        result.free_spins_remaining,
                        result.balance,
                    );
                } else {
                    println!(
                        "round {round}{tag}: no win, free spins left {}, balance {}",
                        result.free_spins_remaining, result.balance,
                    );
                }
            }
            Err(err) => {
                eprintln!("round {round}: {err}");
                break;
            }
        }
    }

    Ok(())
}
