use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One segment of a progressive schedule.
///
/// `rate` is a percentage and applies to income in
/// `(previous upper bound, upper_bound]`. `upper_bound == None` marks the
/// open-ended top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    /// Upper bounds at or above this value are treated as unbounded.
    pub const UNBOUNDED_SENTINEL: Decimal = Decimal::from_parts(999_999_999, 0, 0, false, 0);

    pub fn new(
        upper_bound: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        let upper_bound = upper_bound.filter(|bound| *bound < Self::UNBOUNDED_SENTINEL);
        Self { upper_bound, rate }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket {index}: upper bound must be positive, got {bound}")]
    NonPositiveBound { index: usize, bound: Decimal },

    #[error("bracket {index}: upper bound {bound} does not exceed previous bound {previous}")]
    NotIncreasing {
        index: usize,
        bound: Decimal,
        previous: Decimal,
    },

    #[error("bracket {index}: unbounded bracket must be the last one")]
    UnboundedNotLast { index: usize },

    #[error("bracket {index}: rate must be in [0, 100), got {rate}")]
    InvalidRate { index: usize, rate: Decimal },
}

/// A validated, ordered bracket schedule for one country.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Builds a table, checking that bounds are positive and strictly
    /// increasing, that only the last bracket is unbounded, and that every
    /// rate lies in `[0, 100)`.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        let mut previous: Option<Decimal> = None;
        let last = brackets.len().saturating_sub(1);

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate >= Decimal::ONE_HUNDRED {
                return Err(BracketTableError::InvalidRate {
                    index,
                    rate: bracket.rate,
                });
            }

            match bracket.upper_bound {
                None if index != last => {
                    return Err(BracketTableError::UnboundedNotLast { index });
                }
                None => {}
                Some(bound) if bound <= Decimal::ZERO => {
                    return Err(BracketTableError::NonPositiveBound { index, bound });
                }
                Some(bound) => {
                    if let Some(previous) = previous.filter(|p| bound <= *p) {
                        return Err(BracketTableError::NotIncreasing {
                            index,
                            bound,
                            previous,
                        });
                    }
                    previous = Some(bound);
                }
            }
        }

        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// Highest marginal rate in the schedule, in percent.
    pub fn top_rate(&self) -> Decimal {
        self.brackets
            .iter()
            .map(|b| b.rate)
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn sentinel_bound_becomes_unbounded() {
        let bracket = TaxBracket::new(Some(dec!(999999999)), dec!(45));

        assert_eq!(bracket.upper_bound, None);
    }

    #[test]
    fn accepts_increasing_bounds_with_open_top() {
        let table = BracketTable::new(vec![
            TaxBracket::new(Some(dec!(12570)), dec!(0)),
            TaxBracket::new(Some(dec!(50270)), dec!(20)),
            TaxBracket::new(None, dec!(40)),
        ])
        .expect("valid table");

        assert_eq!(table.brackets().len(), 3);
        assert_eq!(table.top_rate(), dec!(40));
    }

    #[test]
    fn empty_table_is_valid() {
        let table = BracketTable::new(Vec::new()).expect("empty table");

        assert!(table.is_empty());
        assert_eq!(table.top_rate(), Decimal::ZERO);
    }

    #[test]
    fn rejects_non_increasing_bounds() {
        let err = BracketTable::new(vec![
            TaxBracket::new(Some(dec!(50000)), dec!(10)),
            TaxBracket::new(Some(dec!(50000)), dec!(20)),
        ])
        .expect_err("duplicate bound");

        assert_eq!(
            err,
            BracketTableError::NotIncreasing {
                index: 1,
                bound: dec!(50000),
                previous: dec!(50000),
            }
        );
    }

    #[test]
    fn rejects_unbounded_bracket_before_the_end() {
        let err = BracketTable::new(vec![
            TaxBracket::new(None, dec!(10)),
            TaxBracket::new(Some(dec!(50000)), dec!(20)),
        ])
        .expect_err("open bracket first");

        assert_eq!(err, BracketTableError::UnboundedNotLast { index: 0 });
    }

    #[test]
    fn rejects_rate_of_one_hundred_percent() {
        let err = BracketTable::new(vec![TaxBracket::new(None, dec!(100))])
            .expect_err("confiscatory rate");

        assert_eq!(
            err,
            BracketTableError::InvalidRate {
                index: 0,
                rate: dec!(100),
            }
        );
    }

    #[test]
    fn rejects_zero_bound() {
        let err = BracketTable::new(vec![TaxBracket::new(Some(dec!(0)), dec!(10))])
            .expect_err("zero bound");

        assert_eq!(
            err,
            BracketTableError::NonPositiveBound {
                index: 0,
                bound: dec!(0),
            }
        );
    }
}
