//! Ledger Settle CLI
//!
//! Reconciles a CSV ledger export and writes settled and unsettled rows
//! to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- ledger.csv > matched_transactions.csv
//! cargo run -- ledger.csv 5 > matched_transactions.csv
//! ```
//!
//! The optional second argument is the date tolerance in days (default 3).
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use ledger_settle::{EngineError, Result, SettlementEngine, DEFAULT_TOLERANCE_DAYS};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(EngineError::MissingArgument);
    }

    let input_path = &args[1];
    let tolerance_days = match args.get(2) {
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|t| *t >= 0)
            .ok_or_else(|| EngineError::InvalidTolerance(raw.clone()))?,
        None => DEFAULT_TOLERANCE_DAYS,
    };

    let file = File::open(input_path)?;
    let reader = BufReader::new(file);

    let engine = SettlementEngine::run(tolerance_days, reader)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    engine.write_output(handle)?;

    Ok(())
}
