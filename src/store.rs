//! In-memory transaction store and candidate selection.
//!
//! Owns the arena of transactions for one run. The engine is the only
//! caller that mutates the `read`/`matched` flags; everything else here is
//! a pure query over the current state.

use crate::error::Result;
use crate::transaction::{RawRecord, Transaction, TxId};
use chrono::Duration;
use csv::{ReaderBuilder, Trim};
use log::warn;
use std::collections::BTreeSet;
use std::io::Read;

/// Transaction arena for a single settlement run.
///
/// Records keep their load order as identity (`TxId` is the arena index),
/// so output ordering and tie-breaks are stable across runs. The store is
/// discarded when the run's results have been collected; nothing persists.
#[derive(Debug, Default)]
pub struct LedgerStore {
    transactions: Vec<Transaction>,
}

impl LedgerStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        LedgerStore {
            transactions: Vec::new(),
        }
    }

    /// Loads ledger rows from a CSV reader.
    ///
    /// Field-level problems (missing strings, bad amounts, bad dates) are
    /// defaulted inside [`RawRecord::into_transaction`]. A row that fails to
    /// deserialize structurally is logged at warn level and skipped. An
    /// unreadable source surfaces as an error before any matching runs.
    pub fn load_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut store = LedgerStore::new();
        for (row_idx, result) in csv_reader.deserialize::<RawRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => {
                    let id = store.transactions.len();
                    store.transactions.push(record.into_transaction(id));
                }
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        Ok(store)
    }

    /// Builds a store from already-constructed transactions (for testing
    /// and for callers that load through another transport).
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        LedgerStore { transactions }
    }

    /// Number of transactions in the store.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Returns `true` if the store holds no transactions.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Borrow a transaction by id.
    pub fn get(&self, id: TxId) -> &Transaction {
        &self.transactions[id]
    }

    /// Iterate all transactions in original record order.
    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    /// Distinct account keys in ascending order.
    ///
    /// Ascending iteration keeps the run deterministic: when a credit could
    /// satisfy debits in different accounts it never will (accounts do not
    /// share rows), but within a run the account order still decides group
    /// numbering.
    pub fn accounts(&self) -> Vec<String> {
        let keys: BTreeSet<&str> = self.transactions.iter().map(|t| t.account.as_str()).collect();
        keys.into_iter().map(str::to_string).collect()
    }

    /// Picks the next debit to process for an account: unread, earliest
    /// date first, undated rows last, ties broken by record order.
    pub fn next_unread_debit(&self, account: &str) -> Option<TxId> {
        self.transactions
            .iter()
            .filter(|t| t.is_debit() && !t.read && t.account == account)
            .min_by_key(|t| (t.date.is_none(), t.date, t.id))
            .map(|t| t.id)
    }

    /// Candidate rows for a debit: same account, not yet read, not yet
    /// matched, exact cost-centre and profit-centre match, and dated within
    /// `tolerance_days` of the debit on either side. Ordered by date
    /// ascending, ties by record order. Accounts never share rows, so
    /// cross-account pairing cannot occur.
    ///
    /// A debit with no parseable date gets an empty candidate set, and an
    /// undated row is never a candidate: every window comparison against
    /// the missing-date sentinel is false.
    pub fn candidates(&self, debit: TxId, tolerance_days: i64) -> Vec<TxId> {
        let debit = self.get(debit);
        let debit_date = match debit.date {
            Some(date) => date,
            None => return Vec::new(),
        };
        let window = Duration::days(tolerance_days);
        let earliest = debit_date - window;
        let latest = debit_date + window;

        let mut ids: Vec<TxId> = self
            .transactions
            .iter()
            .filter(|t| {
                !t.read
                    && !t.matched
                    && t.account == debit.account
                    && t.cost_centre == debit.cost_centre
                    && t.profit_centre == debit.profit_centre
                    && t.date.is_some_and(|d| d >= earliest && d <= latest)
            })
            .map(|t| t.id)
            .collect();
        ids.sort_by_key(|&id| (self.transactions[id].date, id));
        ids
    }

    /// Marks a debit as read. One-way transition; never reset.
    pub fn mark_read(&mut self, id: TxId) {
        debug_assert!(self.transactions[id].is_debit());
        self.transactions[id].read = true;
    }

    /// Marks a transaction as matched. One-way transition; a matched row
    /// drops out of every later candidate set.
    pub fn mark_matched(&mut self, id: TxId) {
        self.transactions[id].matched = true;
    }
}
