//! Net-to-gross inversion.
//!
//! Take-home pay `net(gross) = gross - tax(gross) - deductions(gross)` is
//! non-decreasing in gross (every marginal rate is below 100%) but has no
//! closed-form inverse, so the gross figure is recovered by bisection.
//!
//! The search first makes sure the root is bracketed: starting from
//! `target * initial_multiplier` the upper bound grows geometrically until
//! `net(hi) >= target`. If that needs more than `max_multiplier` times the
//! target, the search fails with [`InversionError::BoundExceeded`] instead
//! of returning an unconverged estimate.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use salary_core::calculations::{InversionConfig, gross_from_net};
//!
//! // Flat 25% burden: 60,000 gross keeps 45,000.
//! let gross = gross_from_net(dec!(45000), |g| g * dec!(0.75), &InversionConfig::default()).unwrap();
//!
//! assert_eq!(gross, dec!(60000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::calculations::common::round_whole;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InversionError {
    #[error("target net income must be non-negative, got {0}")]
    NegativeTarget(Decimal),

    #[error("no gross income up to {bound} reaches a net income of {target}")]
    BoundExceeded { target: Decimal, bound: Decimal },

    #[error("invalid inversion settings: {0}")]
    InvalidConfig(&'static str),
}

/// Search parameters for [`gross_from_net`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InversionConfig {
    /// First upper bound, as a multiple of the target.
    pub initial_multiplier: Decimal,
    /// Factor the upper bound grows by while it is still too low.
    pub growth_factor: Decimal,
    /// Largest upper bound tried, as a multiple of the target.
    pub max_multiplier: Decimal,
    /// Bisection rounds once the root is bracketed.
    pub iterations: u32,
}

impl Default for InversionConfig {
    fn default() -> Self {
        Self {
            initial_multiplier: Decimal::from(3),
            growth_factor: Decimal::TWO,
            max_multiplier: Decimal::ONE_THOUSAND,
            iterations: 50,
        }
    }
}

impl InversionConfig {
    pub fn validate(&self) -> Result<(), InversionError> {
        if self.initial_multiplier < Decimal::ONE {
            return Err(InversionError::InvalidConfig(
                "initial multiplier must be at least 1",
            ));
        }
        if self.growth_factor <= Decimal::ONE {
            return Err(InversionError::InvalidConfig(
                "growth factor must be greater than 1",
            ));
        }
        if self.max_multiplier < self.initial_multiplier {
            return Err(InversionError::InvalidConfig(
                "max multiplier must not be below the initial multiplier",
            ));
        }
        if self.iterations == 0 {
            return Err(InversionError::InvalidConfig("iterations must be positive"));
        }
        Ok(())
    }
}

/// Finds the gross income whose take-home pay under `net` is `target`,
/// rounded to whole currency units.
///
/// `net` must be non-decreasing and satisfy `net(g) <= g`; the target
/// itself is then a valid lower bound.
///
/// # Errors
///
/// * [`InversionError::NegativeTarget`] for a negative target.
/// * [`InversionError::BoundExceeded`] when no gross income up to
///   `max(target, 1) * max_multiplier` reaches the target.
/// * [`InversionError::InvalidConfig`] when `config` cannot bracket a root.
pub fn gross_from_net<F>(
    target: Decimal,
    net: F,
    config: &InversionConfig,
) -> Result<Decimal, InversionError>
where
    F: Fn(Decimal) -> Decimal,
{
    config.validate()?;
    if target < Decimal::ZERO {
        return Err(InversionError::NegativeTarget(target));
    }

    let ceiling = target.max(Decimal::ONE) * config.max_multiplier;
    let mut lo = target;
    let mut hi = (target * config.initial_multiplier).max(Decimal::ONE);

    while net(hi) < target {
        if hi >= ceiling {
            return Err(InversionError::BoundExceeded {
                target,
                bound: ceiling,
            });
        }
        lo = hi;
        hi = (hi * config.growth_factor).min(ceiling);
        trace!(%target, %hi, "widening inversion bound");
    }

    for _ in 0..config.iterations {
        let mid = (lo + hi) / Decimal::TWO;
        if net(mid) < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    Ok(round_whole((lo + hi) / Decimal::TWO))
}
