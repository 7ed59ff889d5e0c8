//! Mandatory non-tax deductions.
//!
//! Three additive layers, applied in order:
//!
//! | Step | Source | Amount |
//! |------|--------|--------|
//! | 1 | Country social security | `rate%` of income up to `cap`, then `reduced_rate%` of the excess |
//! | 2 | City overrides | each `rate%` of gross, or its flat annual amount |
//! | 3 | Country solidarity surcharge | `rate%` of income tax |
//!
//! Local overrides never replace the national rules; they are stacked on
//! top of them. A country without deduction rules levies nothing, so its
//! cities' overrides are ignored as well.

use rust_decimal::Decimal;

use crate::calculations::common::percent_of;
use crate::calculations::tax::compute_tax;
use crate::{BracketTable, CountryDeductions, DeductionOverride, OverrideAmount, SocialSecurityRule};

/// Computes total deductions on `gross` annual income.
///
/// Returns zero when `rules` is `None`. `brackets` is only consulted for
/// the solidarity surcharge; with no schedule the surcharge base (income
/// tax) is zero.
pub fn compute_deductions(
    gross: Decimal,
    rules: Option<&CountryDeductions>,
    overrides: &[DeductionOverride],
    brackets: Option<&BracketTable>,
) -> Decimal {
    let Some(rules) = rules else {
        return Decimal::ZERO;
    };
    let income = gross.max(Decimal::ZERO);
    let mut total = Decimal::ZERO;

    if let Some(ss) = &rules.social_security {
        total += social_security(income, ss);
    }

    total += overrides
        .iter()
        .map(|rule| match rule.amount {
            OverrideAmount::Rate(rate) => percent_of(income, rate),
            OverrideAmount::FlatAnnual(amount) => amount,
        })
        .sum::<Decimal>();

    if let Some(solidarity) = &rules.solidarity {
        let income_tax = brackets.map_or(Decimal::ZERO, |table| compute_tax(income, table));
        total += percent_of(income_tax, solidarity.rate);
    }

    total
}

fn social_security(
    income: Decimal,
    rule: &SocialSecurityRule,
) -> Decimal {
    let Some(cap) = rule.cap else {
        return percent_of(income, rule.rate);
    };

    let mut contribution = percent_of(income.min(cap), rule.rate);
    if let Some(reduced) = rule.reduced_rate {
        if income > cap {
            contribution += percent_of(income - cap, reduced);
        }
    }
    contribution
}
