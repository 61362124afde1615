//! Matching key derivation

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::fmt;

use crate::types::*;

/// Canonical comparison key shared by transactions and statement lines
///
/// Two records pair up when their keys are equal, whichever side they came
/// from. The amount is stored as a normalised absolute value so that `10`,
/// `10.0` and `-10.00` all land on the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    polarity: Polarity,
    amount: BigDecimal,
    date: NaiveDate,
}

impl MatchKey {
    /// Derive a key from its three components
    pub fn derive(polarity: Polarity, amount: &BigDecimal, date: NaiveDate) -> Self {
        Self {
            polarity,
            amount: amount.abs().normalized(),
            date,
        }
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn amount(&self) -> &BigDecimal {
        &self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // normalisation turns 10 into 1E+1, print it back without an exponent
        let (_, scale) = self.amount.as_bigint_and_exponent();
        let amount = if scale < 0 {
            self.amount.with_scale(0)
        } else {
            self.amount.clone()
        };
        write!(
            f,
            "{}:{}:{}",
            self.polarity,
            amount,
            self.date.format("%Y-%m-%d")
        )
    }
}

/// Records that can be placed in a matching index
pub trait Keyed {
    fn match_key(&self) -> MatchKey;
}

impl Keyed for Transaction {
    fn match_key(&self) -> MatchKey {
        MatchKey::derive(self.polarity, &self.amount, self.date())
    }
}

impl Keyed for StatementLine {
    fn match_key(&self) -> MatchKey {
        MatchKey::derive(self.polarity(), &self.amount, self.date)
    }
}

impl Keyed for LabeledStatementLine {
    fn match_key(&self) -> MatchKey {
        self.line.match_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_debit_statement_matches_debit_transaction() {
        let trx = Transaction::debit(
            "1",
            BigDecimal::from(10),
            day(14).and_hms_opt(10, 10, 10).unwrap(),
        );
        let line = StatementLine::new("a", BigDecimal::from(-10), day(14));

        assert_eq!(trx.match_key(), line.match_key());
        assert_eq!(line.match_key().polarity(), Polarity::Debit);
    }

    #[test]
    fn test_polarity_separates_keys() {
        let credit = MatchKey::derive(Polarity::Credit, &BigDecimal::from(10), day(14));
        let debit = MatchKey::derive(Polarity::Debit, &BigDecimal::from(10), day(14));
        assert_ne!(credit, debit);
    }

    #[test]
    fn test_trailing_zeros_are_ignored() {
        let plain = MatchKey::derive(Polarity::Credit, &BigDecimal::from(10), day(1));
        let padded = MatchKey::derive(
            Polarity::Credit,
            &BigDecimal::from_str("10.00").unwrap(),
            day(1),
        );
        assert_eq!(plain, padded);
        assert_eq!(padded.to_string(), "CREDIT:10:2025-03-01");
    }

    #[test]
    fn test_date_separates_keys() {
        let a = MatchKey::derive(Polarity::Credit, &BigDecimal::from(10), day(1));
        let b = MatchKey::derive(Polarity::Credit, &BigDecimal::from(10), day(2));
        assert_ne!(a, b);
    }
}
