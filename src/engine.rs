//! Core settlement engine.
//!
//! Pairs debit transactions with offsetting credits per account: debits are
//! processed earliest-date first, candidates are scoped to the debit's cost
//! and profit centres inside a date window, and a credit joins the debit's
//! settlement group when its description numbers overlap the debit's. The
//! matching is greedy and order-dependent: once a credit is claimed it is
//! out of the pool for every later debit.

use crate::error::Result;
use crate::settlement::SettlementRecord;
use crate::store::LedgerStore;
use crate::transaction::number_overlap;
use log::debug;
use std::io::{Read, Write};
use uuid::Uuid;

/// The settlement engine.
///
/// Holds the configured date tolerance and accumulates output records as
/// matching proceeds. One engine drives exactly one run; results stay in
/// memory after the run so a failed output write can be retried without
/// recomputing.
///
/// # Output Ordering
///
/// Settlement groups appear in the order they were formed (accounts
/// ascending, debits by date within an account, credits before their debit
/// within a group, mirroring the order records were attached). All
/// unsettled rows follow in original record order.
pub struct SettlementEngine {
    /// Date window half-width, in days.
    tolerance_days: i64,

    /// Accumulated output rows (matched groups, then unsettled sweep).
    results: Vec<SettlementRecord>,
}

/// Default candidate window, in days either side of the debit date.
pub const DEFAULT_TOLERANCE_DAYS: i64 = 3;

impl SettlementEngine {
    /// Creates an engine with the given date tolerance.
    pub fn new(tolerance_days: i64) -> Self {
        SettlementEngine {
            tolerance_days,
            results: Vec::new(),
        }
    }

    /// Full run over a CSV source: load, settle, sweep unsettled.
    ///
    /// Returns the engine holding the complete output sequence, ready for
    /// [`write_output`](Self::write_output).
    pub fn run<R: Read>(tolerance_days: i64, reader: R) -> Result<Self> {
        let mut store = LedgerStore::load_csv(reader)?;
        let mut engine = SettlementEngine::new(tolerance_days);
        engine.settle(&mut store);
        engine.collect_unsettled(&store);
        Ok(engine)
    }

    /// Runs the per-account matching loop over the whole store.
    ///
    /// For each account in ascending order: repeatedly select the earliest
    /// unread debit, mark it read, and try to attach credits to it. Each
    /// debit attempt gets a fresh settlement group id; the group only
    /// materializes in the output if at least one credit attached.
    pub fn settle(&mut self, store: &mut LedgerStore) {
        for account in store.accounts() {
            while let Some(debit_id) = store.next_unread_debit(&account) {
                store.mark_read(debit_id);
                self.match_credits(store, debit_id);
            }
        }
    }

    /// Attaches every qualifying credit to the given debit.
    ///
    /// Candidates are walked in date order. A candidate qualifies when it
    /// is a credit, still unmatched, lies within the date window (guaranteed
    /// by the selector, re-checked here), and its description numbers score
    /// a positive overlap against the debit's. Every qualifying candidate is
    /// attached; there is no single best credit. The debit itself joins the
    /// group only if at least one credit did.
    fn match_credits(&mut self, store: &mut LedgerStore, debit_id: usize) {
        let group = Uuid::new_v4();
        let candidates = store.candidates(debit_id, self.tolerance_days);
        let mut attached_credit = false;

        for candidate_id in candidates {
            let debit = store.get(debit_id);
            let candidate = store.get(candidate_id);
            // Only credits attach; the selector itself does not filter on kind.
            if candidate.is_debit() {
                continue;
            }
            if candidate.matched {
                debug!("Tx {}: candidate already matched, skipping", candidate_id);
                continue;
            }
            if !within_window(debit.date, candidate.date, self.tolerance_days) {
                continue;
            }

            let score = number_overlap(&debit.description_numbers, &candidate.description_numbers);
            if score == 0 {
                continue;
            }
            debug!(
                "Tx {}: attached to debit {} in group {} (overlap {})",
                candidate_id, debit_id, group, score
            );
            store.mark_matched(candidate_id);
            self.results
                .push(SettlementRecord::matched(store.get(candidate_id), group));
            attached_credit = true;
        }

        if attached_credit {
            store.mark_matched(debit_id);
            self.results
                .push(SettlementRecord::matched(store.get(debit_id), group));
        } else {
            debug!("Tx {}: no credit attached, debit stays unsettled", debit_id);
        }
    }

    /// Appends every still-unmatched transaction, in original record order,
    /// with an empty settlement id. Call once, after [`settle`](Self::settle).
    pub fn collect_unsettled(&mut self, store: &LedgerStore) {
        for tx in store.iter().filter(|t| !t.matched) {
            self.results.push(SettlementRecord::unsettled(tx));
        }
    }

    /// The accumulated output rows.
    pub fn results(&self) -> &[SettlementRecord] {
        &self.results
    }

    /// Writes the output sequence as CSV.
    ///
    /// The results stay in memory on failure, so the caller may retry the
    /// write without rerunning the match.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for record in &self.results {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Window check against the missing-date sentinel: any comparison involving
/// an unparsed date is false, so undated rows never pair.
fn within_window(
    debit: Option<chrono::NaiveDate>,
    candidate: Option<chrono::NaiveDate>,
    tolerance_days: i64,
) -> bool {
    match (debit, candidate) {
        (Some(d), Some(c)) => (c - d).num_days().abs() <= tolerance_days,
        _ => false,
    }
}
