use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeductionRuleError {
    #[error("{field} must be in [0, 100), got {value}")]
    InvalidRate { field: &'static str, value: Decimal },

    #[error("social security cap must be positive, got {0}")]
    NonPositiveCap(Decimal),

    #[error("flat annual deduction must be non-negative, got {0}")]
    NegativeFlatAmount(Decimal),
}

fn check_rate(
    field: &'static str,
    value: Decimal,
) -> Result<(), DeductionRuleError> {
    if value < Decimal::ZERO || value >= Decimal::ONE_HUNDRED {
        return Err(DeductionRuleError::InvalidRate { field, value });
    }
    Ok(())
}

/// Employee social-security contribution with an optional ceiling.
///
/// `rate` applies up to `cap`; above the cap `reduced_rate` applies when
/// present, otherwise nothing (UK national insurance is the two-tier case).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSecurityRule {
    pub rate: Decimal,
    pub cap: Option<Decimal>,
    pub reduced_rate: Option<Decimal>,
}

impl SocialSecurityRule {
    pub fn validate(&self) -> Result<(), DeductionRuleError> {
        check_rate("social security rate", self.rate)?;
        if let Some(reduced) = self.reduced_rate {
            check_rate("social security reduced rate", reduced)?;
        }
        match self.cap {
            Some(cap) if cap <= Decimal::ZERO => Err(DeductionRuleError::NonPositiveCap(cap)),
            _ => Ok(()),
        }
    }
}

/// Surcharge levied as a percentage of income tax (German Solidaritätszuschlag).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolidarityRule {
    pub rate: Decimal,
}

/// National deduction rules for one country.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryDeductions {
    pub social_security: Option<SocialSecurityRule>,
    pub solidarity: Option<SolidarityRule>,
}

impl CountryDeductions {
    pub fn validate(&self) -> Result<(), DeductionRuleError> {
        if let Some(ss) = &self.social_security {
            ss.validate()?;
        }
        if let Some(solidarity) = &self.solidarity {
            check_rate("solidarity rate", solidarity.rate)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.social_security.is_none() && self.solidarity.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideAmount {
    /// Percentage of gross income.
    Rate(Decimal),
    /// Fixed amount per year, local currency.
    FlatAnnual(Decimal),
}

/// A named local deduction (city, state or municipal) layered on top of the
/// national rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionOverride {
    pub name: String,
    pub amount: OverrideAmount,
}

impl DeductionOverride {
    pub fn validate(&self) -> Result<(), DeductionRuleError> {
        match self.amount {
            OverrideAmount::Rate(rate) => check_rate("override rate", rate),
            OverrideAmount::FlatAnnual(amount) if amount < Decimal::ZERO => {
                Err(DeductionRuleError::NegativeFlatAmount(amount))
            }
            OverrideAmount::FlatAnnual(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn valid_two_tier_rule_passes() {
        let rule = SocialSecurityRule {
            rate: dec!(8),
            cap: Some(dec!(50270)),
            reduced_rate: Some(dec!(2)),
        };

        assert_eq!(rule.validate(), Ok(()));
    }

    #[test]
    fn negative_rate_is_rejected() {
        let rule = SocialSecurityRule {
            rate: dec!(-1),
            cap: None,
            reduced_rate: None,
        };

        assert_eq!(
            rule.validate(),
            Err(DeductionRuleError::InvalidRate {
                field: "social security rate",
                value: dec!(-1),
            })
        );
    }

    #[test]
    fn zero_cap_is_rejected() {
        let rule = SocialSecurityRule {
            rate: dec!(7.65),
            cap: Some(dec!(0)),
            reduced_rate: None,
        };

        assert_eq!(rule.validate(), Err(DeductionRuleError::NonPositiveCap(dec!(0))));
    }

    #[test]
    fn solidarity_rate_is_checked() {
        let rules = CountryDeductions {
            social_security: None,
            solidarity: Some(SolidarityRule { rate: dec!(100) }),
        };

        assert_eq!(
            rules.validate(),
            Err(DeductionRuleError::InvalidRate {
                field: "solidarity rate",
                value: dec!(100),
            })
        );
    }

    #[test]
    fn negative_flat_override_is_rejected() {
        let local = DeductionOverride {
            name: "council_tax".to_string(),
            amount: OverrideAmount::FlatAnnual(dec!(-10)),
        };

        assert_eq!(
            local.validate(),
            Err(DeductionRuleError::NegativeFlatAmount(dec!(-10)))
        );
    }

    #[test]
    fn empty_rules_report_empty() {
        assert!(CountryDeductions::default().is_empty());
    }
}
