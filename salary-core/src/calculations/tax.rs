//! Progressive income tax.
//!
//! Each bracket taxes only the slice of income between the previous
//! bracket's upper bound and its own. A country whose table is empty
//! charges no income tax.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use salary_core::calculations::compute_tax;
//! use salary_core::{BracketTable, TaxBracket};
//!
//! let table = BracketTable::new(vec![
//!     TaxBracket::new(Some(dec!(50000)), dec!(10)),
//!     TaxBracket::new(None, dec!(20)),
//! ])
//! .unwrap();
//!
//! // 10% of 50,000 plus 20% of the 10,000 above it.
//! assert_eq!(compute_tax(dec!(60000), &table), dec!(7000));
//! ```

use rust_decimal::Decimal;

use crate::BracketTable;
use crate::calculations::common::percent_of;

/// Computes income tax on `gross` annual income under `table`.
///
/// Non-positive income owes nothing. Income beyond the last bounded bracket
/// of a table with no open top bracket is untaxed, matching how such tables
/// are published (the final bound is the ceiling of the schedule).
pub fn compute_tax(
    gross: Decimal,
    table: &BracketTable,
) -> Decimal {
    let mut tax = Decimal::ZERO;
    let mut previous = Decimal::ZERO;

    for bracket in table.brackets() {
        if gross <= previous {
            break;
        }
        let upper = bracket.upper_bound.map_or(gross, |bound| bound.min(gross));
        tax += percent_of(upper - previous, bracket.rate);

        match bracket.upper_bound {
            Some(bound) => previous = bound,
            None => break,
        }
    }

    tax
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::TaxBracket;

    fn two_bracket_table() -> BracketTable {
        BracketTable::new(vec![
            TaxBracket::new(Some(dec!(50000)), dec!(10)),
            TaxBracket::new(Some(dec!(999999999)), dec!(20)),
        ])
        .unwrap()
    }

    fn uk_table() -> BracketTable {
        BracketTable::new(vec![
            TaxBracket::new(Some(dec!(12570)), dec!(0)),
            TaxBracket::new(Some(dec!(50270)), dec!(20)),
            TaxBracket::new(Some(dec!(125140)), dec!(40)),
            TaxBracket::new(None, dec!(45)),
        ])
        .unwrap()
    }

    #[test]
    fn income_inside_first_bracket() {
        assert_eq!(compute_tax(dec!(30000), &two_bracket_table()), dec!(3000));
    }

    #[test]
    fn income_exactly_on_boundary() {
        assert_eq!(compute_tax(dec!(50000), &two_bracket_table()), dec!(5000));
    }

    #[test]
    fn income_spanning_brackets() {
        assert_eq!(compute_tax(dec!(60000), &two_bracket_table()), dec!(7000));
    }

    #[test]
    fn zero_rate_allowance_band() {
        // 20% of (50,270 - 12,570) + 40% of (60,000 - 50,270)
        assert_eq!(compute_tax(dec!(60000), &uk_table()), dec!(11432));
    }

    #[test]
    fn top_bracket_applies_without_limit() {
        // 7,540 + 29,948 + 45% of 74,860
        assert_eq!(compute_tax(dec!(200000), &uk_table()), dec!(71175));
    }

    #[test]
    fn empty_table_yields_zero() {
        let table = BracketTable::default();

        assert_eq!(compute_tax(dec!(1000000), &table), Decimal::ZERO);
    }

    #[test]
    fn zero_and_negative_income_yield_zero() {
        assert_eq!(compute_tax(dec!(0), &uk_table()), Decimal::ZERO);
        assert_eq!(compute_tax(dec!(-500), &uk_table()), Decimal::ZERO);
    }

    #[test]
    fn income_above_bounded_ceiling_is_untaxed() {
        let table = BracketTable::new(vec![TaxBracket::new(Some(dec!(10000)), dec!(10))]).unwrap();

        assert_eq!(compute_tax(dec!(25000), &table), dec!(1000));
    }

    #[test]
    fn tax_is_non_decreasing_in_income() {
        let table = uk_table();
        let mut previous = Decimal::ZERO;
        let mut income = Decimal::ZERO;

        while income <= dec!(300000) {
            let tax = compute_tax(income, &table);
            assert!(tax >= Decimal::ZERO);
            assert!(tax >= previous, "tax dropped at income {income}");
            previous = tax;
            income += dec!(2500);
        }
    }
}
