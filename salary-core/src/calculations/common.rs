//! Common utility functions for salary calculations.
//!
//! Rounding helpers and percentage arithmetic shared by the tax, deduction
//! and tier calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to whole currency units using half-up rounding
/// (midpoints move away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use salary_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(41999.49)), dec!(41999));
/// assert_eq!(round_whole(dec!(41999.5)), dec!(42000));
/// assert_eq!(round_whole(dec!(-2.5)), dec!(-3));
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a decimal value to one decimal place using half-up rounding.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use salary_core::calculations::common::round_one_dp;
///
/// assert_eq!(round_one_dp(dec!(23.44)), dec!(23.4));
/// assert_eq!(round_one_dp(dec!(23.45)), dec!(23.5));
/// ```
pub fn round_one_dp(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Applies a percentage rate (e.g. `20` for 20%) to an amount.
pub fn percent_of(
    amount: Decimal,
    rate: Decimal,
) -> Decimal {
    amount * rate / Decimal::ONE_HUNDRED
}
