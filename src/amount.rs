//! Signed monetary amount type.
//!
//! Uses `rust_decimal` internally so ledger values survive the trip from
//! CSV to output without floating-point drift. The sign of an amount is
//! what classifies a transaction as debit or credit.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A signed ledger amount.
///
/// Amounts are passthrough values: the engine never does arithmetic on them,
/// it only inspects the sign to classify a row and copies the value into the
/// output. Parsing is lenient at load time (see [`Amount::parse_lenient`]);
/// the strict `FromStr` impl is available for callers that want an error.
///
/// # Examples
///
/// ```
/// use ledger_settle::Amount;
///
/// let debit = Amount::parse_lenient("-120.50");
/// assert!(debit.is_debit());
/// assert_eq!(Amount::parse_lenient("not a number"), Amount::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Zero value, also the default for unparseable input.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Parses an amount, coercing anything unparseable to zero.
    ///
    /// Matches the loader contract: a malformed amount must not fail the
    /// run, it defaults and the row is classified as a credit.
    pub fn parse_lenient(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Amount::ZERO;
        }
        Decimal::from_str(trimmed).map(Amount).unwrap_or(Amount::ZERO)
    }

    /// Returns `true` for negative amounts (debits). Zero is a credit.
    pub fn is_debit(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Amount::parse_lenient(&s))
    }
}
