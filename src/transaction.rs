//! Transaction models for CSV parsing and internal representation,
//! plus the description-number heuristics used for matching.

use crate::amount::Amount;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeSet;

/// Stable transaction identity: the zero-based record index within a run.
///
/// The store's arena is addressed by this index, so identity never depends
/// on pointer equality or row content.
pub type TxId = usize;

/// Date formats accepted at load time. Anything else coerces to `None`.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Raw ledger row as read from CSV.
///
/// Every field except the account is optional; the loader defaults missing
/// values rather than rejecting the row. Column names follow the source
/// ledger export.
#[derive(Debug, Deserialize)]
pub struct RawRecord {
    /// Journal number (opaque passthrough)
    #[serde(rename = "Journal number", default)]
    pub journal_number: Option<String>,

    /// Voucher reference (opaque passthrough)
    #[serde(rename = "Voucher", default)]
    pub voucher: Option<String>,

    /// Signed amount; sign decides debit vs credit
    #[serde(rename = "Amount", default)]
    pub amount: Option<String>,

    /// Posting date
    #[serde(rename = "Date", default)]
    pub date: Option<String>,

    /// Free-text description; digit runs inside it drive matching
    #[serde(rename = "Description", default)]
    pub description: Option<String>,

    /// Cost centre grouping key
    #[serde(rename = "CostCentre", default)]
    pub cost_centre: Option<String>,

    /// Profit centre grouping key
    #[serde(rename = "ProfitCentre", default)]
    pub profit_centre: Option<String>,

    /// Main account; debits and credits only pair within one account
    #[serde(rename = "MainAccount", default)]
    pub account: Option<String>,
}

impl RawRecord {
    /// Converts the raw row into an arena transaction with the given id.
    ///
    /// Applies the defaulting rules: missing strings become empty, an
    /// unparseable amount becomes zero (and therefore a credit), an
    /// unparseable date becomes `None` and the row can never satisfy a
    /// date-window comparison.
    pub fn into_transaction(self, id: TxId) -> Transaction {
        let amount = self
            .amount
            .as_deref()
            .map(Amount::parse_lenient)
            .unwrap_or(Amount::ZERO);
        let kind = if amount.is_debit() {
            TxKind::Debit
        } else {
            TxKind::Credit
        };
        let description = self.description.unwrap_or_default();
        let description_numbers = extract_numbers(&description);

        Transaction {
            id,
            account: self.account.unwrap_or_default(),
            cost_centre: self.cost_centre.unwrap_or_default(),
            profit_centre: self.profit_centre.unwrap_or_default(),
            date: self.date.as_deref().and_then(parse_date),
            amount,
            kind,
            journal_number: self.journal_number.unwrap_or_default(),
            voucher: self.voucher.unwrap_or_default(),
            description,
            description_numbers,
            read: false,
            matched: false,
        }
    }
}

/// Debit or credit, derived once from the amount sign at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    /// Negative amount; the side the matching loop iterates over.
    Debit,
    /// Non-negative amount (zero included); candidate side.
    Credit,
}

/// A ledger transaction held in the store's arena.
///
/// # Flags
///
/// - `read` is set exactly once, on debits only, when the orchestrator
///   selects the row for processing. It is never reset, so an unmatched
///   debit cannot be reselected.
/// - `matched` transitions false to true only; a matched row is permanently
///   out of every later candidate set.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Arena index, stable for the run
    pub id: TxId,

    /// Main account grouping key
    pub account: String,

    /// Cost centre; must match the debit's exactly for candidacy
    pub cost_centre: String,

    /// Profit centre; must match the debit's exactly for candidacy
    pub profit_centre: String,

    /// Posting date; `None` when the source value failed to parse
    pub date: Option<NaiveDate>,

    /// Signed amount (passthrough)
    pub amount: Amount,

    /// Debit or credit, immutable after load
    pub kind: TxKind,

    /// Opaque passthrough
    pub journal_number: String,

    /// Opaque passthrough
    pub voucher: String,

    /// Free-text description (passthrough; numbers already extracted)
    pub description: String,

    /// Maximal digit runs found in the description
    pub description_numbers: BTreeSet<String>,

    /// Selected as a debit to process
    pub read: bool,

    /// Attached to a settlement group
    pub matched: bool,
}

impl Transaction {
    /// Returns `true` for debit rows.
    pub fn is_debit(&self) -> bool {
        self.kind == TxKind::Debit
    }
}

/// Parses a date string against the accepted formats, first match wins.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Extracts all maximal contiguous digit runs from a description.
///
/// Duplicate runs collapse into the set; ordering is lexicographic, which
/// keeps candidate scoring deterministic.
pub fn extract_numbers(description: &str) -> BTreeSet<String> {
    let mut numbers = BTreeSet::new();
    let mut current = String::new();
    for ch in description.chars() {
        if ch.is_ascii_digit() {
            current.push(ch);
        } else if !current.is_empty() {
            numbers.insert(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        numbers.insert(current);
    }
    numbers
}

/// Scores the similarity of two extracted-number sets.
///
/// Counts ordered pairs `(a, b)` with `a` from the debit set and `b` from
/// the candidate set where one token contains the other as a substring
/// (equality included). This is a pairwise containment count, not a count
/// of distinct matching tokens, so the score can exceed the size of either
/// set. Any score above zero is treated as a match signal; magnitude is
/// never compared against a threshold.
pub fn number_overlap(debit: &BTreeSet<String>, candidate: &BTreeSet<String>) -> usize {
    debit
        .iter()
        .flat_map(|a| candidate.iter().map(move |b| (a, b)))
        .filter(|(a, b)| a.contains(b.as_str()) || b.contains(a.as_str()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tokens: &[&str]) -> BTreeSet<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    fn raw(amount: &str, date: &str, description: &str) -> RawRecord {
        RawRecord {
            journal_number: Some("J1".to_string()),
            voucher: Some("V1".to_string()),
            amount: Some(amount.to_string()),
            date: Some(date.to_string()),
            description: Some(description.to_string()),
            cost_centre: Some("CC".to_string()),
            profit_centre: Some("PC".to_string()),
            account: Some("1000".to_string()),
        }
    }

    #[test]
    fn test_extract_numbers_finds_digit_runs() {
        assert_eq!(
            extract_numbers("Payment for INV1002 ref 55"),
            set(&["1002", "55"])
        );
        assert_eq!(extract_numbers("no digits here"), BTreeSet::new());
        assert_eq!(extract_numbers("1002"), set(&["1002"]));
    }

    #[test]
    fn test_extract_numbers_collapses_duplicates() {
        assert_eq!(extract_numbers("55 then 55 again"), set(&["55"]));
    }

    #[test]
    fn test_overlap_exact_token() {
        assert_eq!(number_overlap(&set(&["1002"]), &set(&["1002"])), 1);
    }

    #[test]
    fn test_overlap_substring_both_directions() {
        // "55" inside "5509" and "5509" trivially not inside "55"
        assert_eq!(number_overlap(&set(&["55"]), &set(&["5509"])), 1);
        assert_eq!(number_overlap(&set(&["5509"]), &set(&["55"])), 1);
    }

    #[test]
    fn test_overlap_counts_pairs_not_tokens() {
        // "1" is contained in both candidate tokens, "12" in one of them.
        let score = number_overlap(&set(&["1", "12"]), &set(&["12", "123"]));
        assert_eq!(score, 4);
    }

    #[test]
    fn test_overlap_zero_when_unrelated() {
        assert_eq!(number_overlap(&set(&["42"]), &set(&["77"])), 0);
        assert_eq!(number_overlap(&BTreeSet::new(), &set(&["77"])), 0);
    }

    #[test]
    fn test_into_transaction_derives_kind_from_sign() {
        let tx = raw("-100", "2024-01-10", "INV1002").into_transaction(0);
        assert_eq!(tx.kind, TxKind::Debit);
        let tx = raw("100", "2024-01-10", "INV1002").into_transaction(1);
        assert_eq!(tx.kind, TxKind::Credit);
        // Zero and unparseable amounts are credits.
        let tx = raw("0", "2024-01-10", "x").into_transaction(2);
        assert_eq!(tx.kind, TxKind::Credit);
        let tx = raw("oops", "2024-01-10", "x").into_transaction(3);
        assert_eq!(tx.kind, TxKind::Credit);
        assert!(tx.amount.is_zero());
    }

    #[test]
    fn test_into_transaction_defaults_missing_fields() {
        let record = RawRecord {
            journal_number: None,
            voucher: None,
            amount: None,
            date: None,
            description: None,
            cost_centre: None,
            profit_centre: None,
            account: None,
        };
        let tx = record.into_transaction(7);
        assert_eq!(tx.id, 7);
        assert_eq!(tx.account, "");
        assert_eq!(tx.cost_centre, "");
        assert_eq!(tx.profit_centre, "");
        assert_eq!(tx.journal_number, "");
        assert!(tx.date.is_none());
        assert!(tx.amount.is_zero());
        assert!(tx.description_numbers.is_empty());
        assert!(!tx.read);
        assert!(!tx.matched);
    }

    #[test]
    fn test_date_parsing_formats() {
        let tx = raw("-1", "2024-01-10", "x").into_transaction(0);
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 10));
        let tx = raw("-1", "2024/01/10", "x").into_transaction(0);
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 10));
        let tx = raw("-1", "10/01/2024", "x").into_transaction(0);
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 10));
    }

    #[test]
    fn test_unparseable_date_becomes_none() {
        let tx = raw("-1", "not-a-date", "x").into_transaction(0);
        assert!(tx.date.is_none());
        let tx = raw("-1", "", "x").into_transaction(0);
        assert!(tx.date.is_none());
    }
}
