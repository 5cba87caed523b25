//! Settlement output records.
//!
//! One row per transaction in the final output: matched rows carry the
//! settlement group id they were attached under, unsettled rows carry an
//! empty id. The two sets partition the input.

use crate::amount::Amount;
use crate::transaction::Transaction;
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

/// A single output row, serialized with the source ledger's column names.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementRecord {
    /// Opaque passthrough
    #[serde(rename = "Journal number")]
    pub journal_number: String,

    /// Opaque passthrough
    #[serde(rename = "Voucher")]
    pub voucher: String,

    /// Posting date; empty when the source value failed to parse
    #[serde(rename = "Date")]
    pub date: Option<NaiveDate>,

    /// Main account
    #[serde(rename = "Account")]
    pub account: String,

    /// Cost centre
    #[serde(rename = "CostCentre")]
    pub cost_centre: String,

    /// Profit centre
    #[serde(rename = "ProfitCentre")]
    pub profit_centre: String,

    /// Free-text description
    #[serde(rename = "Description")]
    pub description: String,

    /// Signed amount
    #[serde(rename = "Amount")]
    pub amount: Amount,

    /// Settlement group id; empty string for unsettled rows
    #[serde(rename = "Settlement_Number")]
    pub settlement_number: String,
}

impl SettlementRecord {
    /// Builds the output row for a transaction attached to a group.
    pub fn matched(tx: &Transaction, group: Uuid) -> Self {
        Self::from_transaction(tx, group.to_string())
    }

    /// Builds the output row for a transaction that stayed unsettled.
    pub fn unsettled(tx: &Transaction) -> Self {
        Self::from_transaction(tx, String::new())
    }

    fn from_transaction(tx: &Transaction, settlement_number: String) -> Self {
        SettlementRecord {
            journal_number: tx.journal_number.clone(),
            voucher: tx.voucher.clone(),
            date: tx.date,
            account: tx.account.clone(),
            cost_centre: tx.cost_centre.clone(),
            profit_centre: tx.profit_centre.clone(),
            description: tx.description.clone(),
            amount: tx.amount,
            settlement_number,
        }
    }

    /// Returns `true` if this row belongs to a settlement group.
    pub fn is_settled(&self) -> bool {
        !self.settlement_number.is_empty()
    }
}
