//! # Ledger Settle
//!
//! A ledger reconciliation engine that pairs debit transactions with
//! offsetting credits plausibly belonging to the same settlement.
//!
//! ## Design Principles
//!
//! - **Greedy, order-dependent matching**: debits are processed earliest
//!   first per account; a claimed credit leaves the pool permanently
//! - **Exact centre scoping**: a debit and credit only pair when their cost
//!   and profit centres match exactly, inside a configurable date window
//! - **Number-overlap scoring**: digit runs extracted from descriptions are
//!   compared by substring containment; any positive score is a match
//! - **Lenient loading**: malformed fields default rather than fail the run
//!
//! ## Example
//!
//! ```no_run
//! use ledger_settle::SettlementEngine;
//! use std::io::Cursor;
//!
//! let csv = "Journal number,Voucher,Amount,Date,Description,CostCentre,ProfitCentre,MainAccount\n\
//!            J1,V1,-100,2024-01-10,INV1002,A,X,1000\n\
//!            J2,V2,100,2024-01-11,Payment for INV1002,A,X,1000\n";
//! let engine = SettlementEngine::run(3, Cursor::new(csv)).unwrap();
//! engine.write_output(std::io::stdout()).unwrap();
//! ```

pub mod amount;
pub mod engine;
pub mod error;
pub mod settlement;
pub mod store;
pub mod transaction;

pub use amount::Amount;
pub use engine::{SettlementEngine, DEFAULT_TOLERANCE_DAYS};
pub use error::{EngineError, Result};
pub use settlement::SettlementRecord;
pub use store::LedgerStore;
pub use transaction::{extract_numbers, number_overlap, RawRecord, Transaction, TxId, TxKind};
